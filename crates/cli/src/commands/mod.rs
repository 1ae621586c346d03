//! Subcommand implementations.
//!
//! Each command works on an [`AppState`](vitrine_storefront::state::AppState)
//! built from the environment, exactly as the server does.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod orders;

use thiserror::Error;
use vitrine_storefront::api::ApiError;
use vitrine_storefront::checkout::CheckoutError;
use vitrine_storefront::storage::StorageError;

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("Failed to read {path}: {source}")]
    ReadForm {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not signed in. Run `vitrine login` first")]
    NotSignedIn,

    #[error("{0}")]
    NotFound(String),
}
