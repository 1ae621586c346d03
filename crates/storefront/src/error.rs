//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Error bodies are JSON: `{"error": "..."}`, plus a `fields` array for
//! checkout validation failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::orders::OrderError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Upstream API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Local storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Order history failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Checkout was refused.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Api(err) => match err {
                ApiError::NotFound(_) => StatusCode::NOT_FOUND,
                ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                ApiError::InvalidPostalCode(_) => StatusCode::BAD_REQUEST,
                ApiError::Status(status) if *status == StatusCode::UNAUTHORIZED => {
                    StatusCode::UNAUTHORIZED
                }
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart => StatusCode::BAD_REQUEST,
                CheckoutError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
                CheckoutError::Order(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Storage(_) | Self::Order(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Internal details are never exposed.
    fn public_message(&self) -> String {
        match self {
            Self::Api(err) => match err {
                ApiError::NotFound(msg) => msg.clone(),
                ApiError::Timeout => "Request timeout".to_string(),
                ApiError::InvalidPostalCode(_) => "CEP deve ter 8 dígitos".to_string(),
                ApiError::Status(status) if *status == StatusCode::UNAUTHORIZED => {
                    "Invalid credentials".to_string()
                }
                _ => "External service error".to_string(),
            },
            Self::Checkout(CheckoutError::EmptyCart) => "Cart is empty".to_string(),
            Self::Checkout(CheckoutError::Invalid(_)) => "Invalid checkout form".to_string(),
            Self::Storage(_)
            | Self::Order(_)
            | Self::Checkout(CheckoutError::Order(_))
            | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = match &self {
            Self::Checkout(CheckoutError::Invalid(errors)) => json!({
                "error": self.public_message(),
                "fields": errors,
            }),
            _ => json!({ "error": self.public_message() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
