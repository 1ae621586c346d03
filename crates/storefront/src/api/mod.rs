//! Clients for the upstream REST services.
//!
//! # Services
//!
//! - Product/auth API (Fake Store API compatible): products, categories,
//!   login and user lookup
//! - Address lookup (ViaCEP compatible): Brazilian postal code to address
//!
//! All clients share [`ApiClient`], which applies a per-request timeout,
//! retries transient failures with exponential backoff and logs failures.
//! Catalog responses are cached in memory via `moka`.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine_storefront::api::{ApiClient, CatalogClient, RetryPolicy};
//!
//! let client = ApiClient::new("https://fakestoreapi.com", timeout, RetryPolicy::default())?;
//! let catalog = CatalogClient::new(client);
//! let products = catalog.get_products().await?;
//! ```

mod address;
mod auth;
mod cache;
mod catalog;
mod client;
pub mod types;

pub use address::AddressClient;
pub use auth::AuthClient;
pub use catalog::CatalogClient;
pub use client::{ApiClient, RetryPolicy};
pub use types::*;

use reqwest::StatusCode;
use thiserror::Error;
use vitrine_core::ProductId;

/// Errors that can occur when calling an upstream service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("Request timeout")]
    Timeout,

    /// Upstream answered with a non-success status.
    #[error("HTTP error! status: {0}")]
    Status(StatusCode),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Upstream returned a product with a negative price or a rating
    /// outside 0 to 5.
    #[error("Malformed product from upstream: {0}")]
    MalformedProduct(ProductId),

    /// Postal code does not have 8 digits.
    #[error("CEP deve ter 8 dígitos: {0:?}")]
    InvalidPostalCode(String),

    /// Base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Whether retrying the same request may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout => true,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Status(status) => status.is_server_error(),
            _ => false,
        }
    }
}
