//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness check
//!
//! # Catalog
//! GET    /products               - Product listing (?category&search&sort&min_price&max_price)
//! GET    /products/{id}          - Product detail
//! GET    /categories             - Category names
//!
//! # Cart
//! GET    /cart                   - Current cart
//! DELETE /cart                   - Clear cart
//! POST   /cart/items             - Add product {product_id, quantity?}
//! GET    /cart/items/{id}        - Quantity of one product
//! PATCH  /cart/items/{id}        - Set {quantity} or change by {delta}
//! DELETE /cart/items/{id}        - Remove product
//!
//! # Address
//! GET    /address/{cep}          - Postal code lookup
//!
//! # Auth
//! POST   /auth/login             - Login {username, password}
//! POST   /auth/logout            - Logout
//! GET    /auth/me                - Signed-in user (requires auth)
//!
//! # Checkout (requires auth)
//! POST   /checkout               - Place order from cart
//! GET    /orders                 - Order history
//! GET    /orders/{id}            - Order detail
//! ```

pub mod address;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    extract::Request,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route(
            "/items/{id}",
            get(cart::item).patch(cart::update).delete(cart::remove),
        )
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .route("/categories", get(products::categories))
        .nest("/cart", cart_routes())
        .route("/address/{cep}", get(address::lookup))
        .nest("/auth", auth_routes())
        .route("/checkout", post(checkout::place_order))
        .route("/orders", get(checkout::orders))
        .route("/orders/{id}", get(checkout::order))
}

/// Build the complete application with tracing and request ids.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check upstream services.
pub async fn health() -> &'static str {
    "ok"
}
