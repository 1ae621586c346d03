//! The cart aggregate.
//!
//! A [`Cart`] is an ordered list of line items, at most one per product, plus
//! two derived aggregates: the monetary `total` and the item count
//! `total_items`. Fields are private so the aggregates can only change
//! through the mutation methods below, each of which recomputes them before
//! returning.
//!
//! # Invariants
//!
//! After every public method returns:
//! - `total == Σ price × quantity` over all lines
//! - `total_items == Σ quantity` over all lines
//! - every line has `quantity >= 1`
//! - no two lines share a product id
//!
//! # Wire format
//!
//! ```json
//! {"items":[{"id":1,"product":{...},"quantity":2}],"total":59.98,"totalItems":2}
//! ```
//!
//! Deserialization validates the line items and recomputes both aggregates;
//! stored totals are never trusted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::Product;
use crate::types::ProductId;

/// Reasons a set of line items cannot form a valid [`Cart`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Two lines reference the same product.
    #[error("duplicate line for product {0}")]
    DuplicateLine(ProductId),

    /// A line has a quantity of zero.
    #[error("line for product {0} has zero quantity")]
    ZeroQuantity(ProductId),

    /// A line's id does not match its embedded product.
    #[error("line id {line} does not match product id {product}")]
    MismatchedLineId {
        /// The line's own id.
        line: ProductId,
        /// The embedded product's id.
        product: ProductId,
    },

    /// The embedded product carries values outside their domain.
    #[error("line for product {0} embeds a malformed product")]
    MalformedProduct(ProductId),
}

/// One product-and-quantity pairing within the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Line identity; always equal to `product.id`.
    pub id: ProductId,
    /// Product snapshot taken when the line was first added.
    pub product: Product,
    /// Number of units (at least 1).
    pub quantity: u32,
}

impl CartLineItem {
    /// Price of this line (`unit price × quantity`).
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product
            .price
            .saturating_mul(Decimal::from(self.quantity))
    }
}

/// The shopping cart: line items plus derived totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "CartRecord")]
pub struct Cart {
    items: Vec<CartLineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
    total_items: u64,
}

/// Untrusted stored shape of a cart. Stored aggregates are skipped.
#[derive(Deserialize)]
struct CartRecord {
    items: Vec<CartLineItem>,
}

impl TryFrom<CartRecord> for Cart {
    type Error = CartError;

    fn try_from(record: CartRecord) -> Result<Self, Self::Error> {
        Self::from_items(record.items)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            total: Decimal::ZERO,
            total_items: 0,
        }
    }

    /// Build a cart from existing line items, validating every line.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if any line has a zero quantity, an id that
    /// differs from its product, a malformed product, or if two lines share
    /// a product id.
    pub fn from_items(items: Vec<CartLineItem>) -> Result<Self, CartError> {
        for (index, line) in items.iter().enumerate() {
            if line.id != line.product.id {
                return Err(CartError::MismatchedLineId {
                    line: line.id,
                    product: line.product.id,
                });
            }
            if line.quantity == 0 {
                return Err(CartError::ZeroQuantity(line.id));
            }
            if !line.product.is_well_formed() {
                return Err(CartError::MalformedProduct(line.id));
            }
            if items.iter().take(index).any(|other| other.id == line.id) {
                return Err(CartError::DuplicateLine(line.id));
            }
        }

        let mut cart = Self {
            items,
            total: Decimal::ZERO,
            total_items: 0,
        };
        cart.recompute();
        Ok(cart)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Line items in the order products were first added.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Sum of `price × quantity` over all lines.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// Sum of quantities over all lines.
    ///
    /// Wider than a line quantity so the sum over any number of full lines
    /// stays exact.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn item(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|line| line.id == product_id)
    }

    /// Quantity of `product_id` in the cart, or 0 if absent.
    #[must_use]
    pub fn item_quantity(&self, product_id: ProductId) -> u32 {
        self.item(product_id).map_or(0, |line| line.quantity)
    }

    /// Whether `product_id` has a line in the cart.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|line| line.id == product_id)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of `product`.
    ///
    /// Increases the existing line for the product, or appends a new line
    /// with a snapshot of `product`. Adding zero units, or a product that is
    /// not [well formed](Product::is_well_formed), changes nothing.
    ///
    /// Returns whether the cart changed.
    pub fn add(&mut self, product: &Product, quantity: u32) -> bool {
        if quantity == 0 || !product.is_well_formed() {
            return false;
        }

        match self.items.iter_mut().find(|line| line.id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.items.push(CartLineItem {
                id: product.id,
                product: product.clone(),
                quantity,
            }),
        }

        self.recompute();
        true
    }

    /// Remove the line for `product_id`.
    ///
    /// Returns whether a line was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|line| line.id != product_id);
        if self.items.len() == before {
            return false;
        }

        self.recompute();
        true
    }

    /// Set the quantity of `product_id` to exactly `quantity`.
    ///
    /// A quantity of zero or below removes the line. Unknown ids are
    /// ignored. Quantities above `u32::MAX` are clamped.
    ///
    /// Returns whether the cart changed.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(product_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let Some(line) = self.items.iter_mut().find(|line| line.id == product_id) else {
            return false;
        };
        if line.quantity == quantity {
            return false;
        }
        line.quantity = quantity;

        self.recompute();
        true
    }

    /// Change the quantity of `product_id` by `delta`.
    ///
    /// The read and the write happen in one call, so concurrent callers
    /// sharing the cart behind a lock never decrement from a stale value.
    /// A resulting quantity of zero or below removes the line.
    ///
    /// Returns whether the cart changed.
    pub fn adjust_quantity(&mut self, product_id: ProductId, delta: i64) -> bool {
        let Some(current) = self.item(product_id).map(|line| line.quantity) else {
            return false;
        };
        self.set_quantity(product_id, i64::from(current).saturating_add(delta))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.total = self
            .items
            .iter()
            .fold(Decimal::ZERO, |sum, line| sum.saturating_add(line.subtotal()));
        self.total_items = self
            .items
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum();
    }
}
