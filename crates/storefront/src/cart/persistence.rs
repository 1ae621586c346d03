//! Durable storage for the cart.

use std::sync::Arc;

use tracing::{debug, warn};
use vitrine_core::Cart;

use crate::storage::KeyValueStorage;

/// Storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "ecommerce_cart";

/// Loads and saves a single cart blob.
///
/// Neither operation can fail from the caller's point of view: a cart that
/// cannot be read is treated as absent, and a cart that cannot be written
/// stays authoritative in memory.
pub trait CartPersistence: Send + Sync {
    /// Read the stored cart, if one exists and is valid.
    fn load(&self) -> Option<Cart>;

    /// Overwrite the stored cart.
    fn save(&self, cart: &Cart);
}

/// [`CartPersistence`] over a [`KeyValueStorage`] under a fixed key.
#[derive(Clone)]
pub struct LocalCartPersistence {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl LocalCartPersistence {
    /// Persist under [`CART_STORAGE_KEY`].
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_key(storage, CART_STORAGE_KEY)
    }

    /// Persist under a custom key.
    #[must_use]
    pub fn with_key(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }
}

impl CartPersistence for LocalCartPersistence {
    fn load(&self) -> Option<Cart> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no stored cart");
                return None;
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read stored cart");
                return None;
            }
        };

        match serde_json::from_str::<Cart>(&raw) {
            Ok(cart) => {
                debug!(key = %self.key, lines = cart.len(), "restored cart");
                Some(cart)
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding unreadable stored cart");
                None
            }
        }
    }

    fn save(&self, cart: &Cart) {
        let raw = match serde_json::to_string(cart) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.storage.set(&self.key, &raw) {
            warn!(key = %self.key, error = %e, "failed to persist cart");
        }
    }
}
