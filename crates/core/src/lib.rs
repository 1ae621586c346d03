//! Vitrine Core - Shared domain library.
//!
//! This crate provides the domain model used across all Vitrine components:
//! - `storefront` - Cart store, persistence, upstream clients and JSON API
//! - `cli` - Terminal storefront over file-backed storage
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, emails, statuses and price formatting
//! - [`product`] - Catalog products as returned by the upstream API
//! - [`cart`] - The cart aggregate and its derived totals
//! - [`order`] - Placed orders
//! - [`checkout`] - Checkout form and its validation rules
//! - [`filters`] - Product listing filters and sorting
//! - [`validators`] / [`formatters`] - Brazilian document and input helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod filters;
pub mod formatters;
pub mod order;
pub mod product;
pub mod types;
pub mod validators;

pub use cart::{Cart, CartLineItem};
pub use checkout::{CheckoutForm, FieldError, ValidationErrors};
pub use filters::{ProductFilters, SortBy};
pub use order::Order;
pub use product::{Product, Rating};
pub use types::*;
