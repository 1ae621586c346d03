//! Product listing filters and sorting.

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortBy {
    #[serde(rename = "price-asc")]
    PriceAsc,
    #[serde(rename = "price-desc")]
    PriceDesc,
    #[serde(rename = "name-asc")]
    NameAsc,
    #[serde(rename = "name-desc")]
    NameDesc,
    /// Highest rated first.
    #[serde(rename = "rating")]
    Rating,
}

/// Error returned when parsing an unknown sort key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order: {0}")]
pub struct UnknownSortOrder(String);

impl FromStr for SortBy {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "name-asc" => Ok(Self::NameAsc),
            "name-desc" => Ok(Self::NameDesc),
            "rating" => Ok(Self::Rating),
            other => Err(UnknownSortOrder(other.to_string())),
        }
    }
}

/// Filters applied to a product listing.
///
/// Every filter is optional; an empty `ProductFilters` returns the listing
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilters {
    /// Exact category match.
    pub category: Option<String>,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
    /// Sort order; `None` keeps upstream order.
    #[serde(rename = "sort")]
    pub sort_by: Option<SortBy>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
}

impl ProductFilters {
    /// Whether `product` passes every filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category
            && product.category != *category
        {
            return false;
        }

        if let Some(search) = self.search.as_deref().map(str::trim)
            && !search.is_empty()
            && !product
                .title
                .to_lowercase()
                .contains(&search.to_lowercase())
        {
            return false;
        }

        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }

        !self.max_price.is_some_and(|max| product.price > max)
    }

    /// Filter and sort `products`.
    ///
    /// Sorting is stable, so ties keep upstream order.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut selected: Vec<Product> = products
            .iter()
            .filter(|product| self.matches(product))
            .cloned()
            .collect();

        if let Some(sort_by) = self.sort_by {
            selected.sort_by(|a, b| compare(sort_by, a, b));
        }

        selected
    }
}

fn compare(sort_by: SortBy, a: &Product, b: &Product) -> Ordering {
    match sort_by {
        SortBy::PriceAsc => a.price.cmp(&b.price),
        SortBy::PriceDesc => b.price.cmp(&a.price),
        SortBy::NameAsc => compare_titles(a, b),
        SortBy::NameDesc => compare_titles(b, a),
        SortBy::Rating => b.rating.rate.total_cmp(&a.rating.rate),
    }
}

fn compare_titles(a: &Product, b: &Product) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title))
}
