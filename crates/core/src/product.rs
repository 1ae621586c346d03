//! Catalog products.
//!
//! Products are owned by the upstream catalog API and treated as immutable
//! values here. The cart copies a snapshot of the product into each line.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Customer rating summary for a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Rating {
    /// Average rating on a 0-5 scale.
    pub rate: f64,
    /// Number of ratings.
    pub count: u32,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price (non-negative). Serialized as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Category name (e.g., "electronics").
    pub category: String,
    /// Image URL.
    pub image: String,
    /// Rating summary.
    #[serde(default)]
    pub rating: Rating,
}

impl Product {
    /// Whether the product carries values the storefront can sell.
    ///
    /// Upstream data is not trusted blindly: a negative price or a rating
    /// outside 0-5 marks the product as malformed.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.price.is_sign_negative()
            && self.rating.rate.is_finite()
            && (0.0..=5.0).contains(&self.rating.rate)
    }
}
