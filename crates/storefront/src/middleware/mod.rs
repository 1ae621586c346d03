//! HTTP middleware and extractors for the storefront API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)

pub mod auth;
pub mod request_id;

pub use auth::RequireSession;
pub use request_id::request_id_middleware;
