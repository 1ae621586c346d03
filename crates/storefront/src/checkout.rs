//! Placing an order from the cart.

use chrono::Utc;
use thiserror::Error;
use tracing::{info, instrument};
use vitrine_core::{CheckoutForm, Order, OrderStatus, ValidationErrors};

use crate::cart::CartStore;
use crate::orders::{OrderError, OrderHistory, generate_order_id};

/// Reasons an order cannot be placed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid checkout form: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Order(#[from] OrderError),
}

/// Turn the current cart into an order.
///
/// The order is saved before the cart is cleared, so a failed save leaves
/// the cart untouched for another attempt.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] if there is nothing to buy,
/// [`CheckoutError::Invalid`] with every failing field, or
/// [`CheckoutError::Order`] if the order cannot be stored.
#[instrument(skip_all, fields(payment_method = %form.payment_method))]
pub fn place_order(
    cart: &mut CartStore,
    history: &OrderHistory,
    form: CheckoutForm,
) -> Result<Order, CheckoutError> {
    let snapshot = cart.cart();
    if snapshot.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    form.validate()?;

    let order = Order::from_cart(
        generate_order_id(),
        &snapshot,
        form,
        Utc::now(),
        OrderStatus::Processed,
    );
    history.save_order(order.clone())?;
    cart.clear_cart();

    info!(
        order_id = %order.id,
        total_items = order.total_items(),
        "Order placed"
    );
    Ok(order)
}
