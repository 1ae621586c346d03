//! Application state shared across handlers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::{AddressClient, ApiClient, ApiError, AuthClient, CatalogClient, RetryPolicy};
use crate::cart::{CartStore, LocalCartPersistence};
use crate::config::StorefrontConfig;
use crate::orders::OrderHistory;
use crate::session::AuthSession;
use crate::storage::{FileStorage, KeyValueStorage};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and owns the single
/// [`CartStore`] for the process.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cart: Mutex<CartStore>,
    orders: OrderHistory,
    session: AuthSession,
    catalog: CatalogClient,
    auth: AuthClient,
    address: AddressClient,
}

impl AppState {
    /// Create state backed by files in `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if an upstream base URL is invalid.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
        Self::with_storage(config, storage)
    }

    /// Create state over an arbitrary storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if an upstream base URL is invalid.
    pub fn with_storage(
        config: StorefrontConfig,
        storage: Arc<dyn KeyValueStorage>,
    ) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api.base_url, config.api.timeout, config.api.retry)?;
        // Address lookups are interactive; fail fast rather than back off
        let viacep = ApiClient::new(&config.viacep_url, config.api.timeout, RetryPolicy::none())?;

        let cart = CartStore::open(LocalCartPersistence::new(Arc::clone(&storage)));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cart: Mutex::new(cart),
                orders: OrderHistory::new(Arc::clone(&storage)),
                session: AuthSession::new(storage),
                catalog: CatalogClient::new(api.clone()),
                auth: AuthClient::new(api),
                address: AddressClient::new(viacep),
                config,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Lock the cart store.
    ///
    /// Hold the guard for one operation and never across an `.await`.
    /// A poisoned lock is recovered: every store mutation publishes a
    /// complete cart, so the state behind it is always consistent.
    pub fn cart(&self) -> MutexGuard<'_, CartStore> {
        self.inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn orders(&self) -> &OrderHistory {
        &self.inner.orders
    }

    #[must_use]
    pub fn session(&self) -> &AuthSession {
        &self.inner.session
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    #[must_use]
    pub fn address(&self) -> &AddressClient {
        &self.inner.address
    }
}
