//! Cache types for catalog responses.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::Expiry;
use vitrine_core::{Product, ProductId};

/// Product listings stay fresh for 5 minutes.
pub const PRODUCTS_TTL: Duration = Duration::from_secs(5 * 60);

/// Categories change rarely; 30 minutes.
pub const CATEGORIES_TTL: Duration = Duration::from_secs(30 * 60);

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Product(ProductId),
    Category(String),
    Categories,
}

impl CacheKey {
    /// How long an entry under this key stays valid.
    #[must_use]
    pub const fn time_to_live(&self) -> Duration {
        match self {
            Self::Categories => CATEGORIES_TTL,
            Self::Products | Self::Product(_) | Self::Category(_) => PRODUCTS_TTL,
        }
    }
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Box<Product>),
    Categories(Arc<Vec<String>>),
}

/// Per-key expiry for the catalog cache.
pub struct CatalogExpiry;

impl Expiry<CacheKey, CacheValue> for CatalogExpiry {
    fn expire_after_create(
        &self,
        key: &CacheKey,
        _value: &CacheValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(key.time_to_live())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_to_live() {
        assert_eq!(CacheKey::Products.time_to_live(), PRODUCTS_TTL);
        assert_eq!(
            CacheKey::Category("electronics".to_string()).time_to_live(),
            PRODUCTS_TTL
        );
        assert_eq!(CacheKey::Categories.time_to_live(), CATEGORIES_TTL);
    }
}
