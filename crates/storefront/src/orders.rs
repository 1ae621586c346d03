//! Order history kept in local storage.
//!
//! Orders are stored as one JSON array under [`ORDERS_STORAGE_KEY`], oldest
//! first. Unlike the cart, a failed write is reported to the caller: losing
//! a placed order silently is worse than refusing to place it.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use vitrine_core::{Order, OrderId};

use crate::storage::{self, KeyValueStorage, StorageError};

/// Storage key holding the order list.
pub const ORDERS_STORAGE_KEY: &str = "orders";

/// Errors saving or clearing orders.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Failed to store order: {0}")]
    Storage(#[from] StorageError),
}

/// Order history over a [`KeyValueStorage`].
#[derive(Clone)]
pub struct OrderHistory {
    storage: Arc<dyn KeyValueStorage>,
}

impl OrderHistory {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Append `order` to the history.
    ///
    /// An unreadable history is replaced by a list holding only `order`.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be written.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub fn save_order(&self, order: Order) -> Result<(), OrderError> {
        let mut orders = self.orders();
        orders.push(order);
        storage::write_json(self.storage.as_ref(), ORDERS_STORAGE_KEY, &orders)?;
        debug!(count = orders.len(), "order saved");
        Ok(())
    }

    /// Every stored order, oldest first.
    ///
    /// Returns an empty list when nothing is stored or the stored list
    /// cannot be read.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        match storage::read_json::<Vec<Order>>(self.storage.as_ref(), ORDERS_STORAGE_KEY) {
            Ok(orders) => orders.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "failed to read order history");
                Vec::new()
            }
        }
    }

    /// Look up an order by id.
    #[must_use]
    pub fn order_by_id(&self, id: OrderId) -> Option<Order> {
        self.orders().into_iter().find(|order| order.id == id)
    }

    /// Delete the whole history.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be removed.
    pub fn clear(&self) -> Result<(), OrderError> {
        self.storage.remove(ORDERS_STORAGE_KEY)?;
        Ok(())
    }
}

/// Generate an order id from the current time in milliseconds plus a small
/// random suffix.
#[must_use]
pub fn generate_order_id() -> OrderId {
    let millis = Utc::now().timestamp_millis();
    let jitter = rand::rng().random_range(0..1000);
    OrderId::new(millis + jitter)
}
