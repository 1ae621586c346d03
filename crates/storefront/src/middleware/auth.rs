//! Authentication extractor.
//!
//! Checkout and order history are only reachable with a signed-in session.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::error::AppError;
use crate::session::SessionUser;
use crate::state::AppState;

/// Extractor that requires a signed-in session.
///
/// Rejects with 401 when no complete session is stored.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireSession(session): RequireSession) -> String {
///     format!("Hello, {}!", session.user.display_name())
/// }
/// ```
pub struct RequireSession(pub SessionUser);

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state
            .session()
            .restore()
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized("Login required".to_string()))
    }
}
