//! Placed orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLineItem};
use crate::checkout::CheckoutForm;
use crate::types::{OrderId, OrderStatus};

/// An order placed from the cart at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Line items copied from the cart at the time of purchase.
    pub items: Vec<CartLineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub form_data: CheckoutForm,
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    /// Build an order from a cart snapshot.
    #[must_use]
    pub fn from_cart(
        id: OrderId,
        cart: &Cart,
        form_data: CheckoutForm,
        date: DateTime<Utc>,
        status: OrderStatus,
    ) -> Self {
        Self {
            id,
            items: cart.items().to_vec(),
            total: cart.total(),
            form_data,
            date,
            status,
        }
    }

    /// Total number of units in the order.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }
}
