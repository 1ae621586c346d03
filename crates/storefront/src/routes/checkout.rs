//! Checkout and order history handlers. All of them require a session.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use vitrine_core::{CheckoutForm, Order, OrderId};

use crate::checkout;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireSession;
use crate::state::AppState;

/// Place an order from the current cart.
#[instrument(skip_all, fields(user_id = %session.user.id))]
pub async fn place_order(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Json(form): Json<CheckoutForm>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = {
        let mut cart = state.cart();
        checkout::place_order(&mut cart, state.orders(), form)?
    };

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", order.id.to_string().as_str())]),
    );
    Ok((StatusCode::CREATED, Json(order)))
}

/// Stored orders, oldest first.
pub async fn orders(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
) -> Json<Vec<Order>> {
    Json(state.orders().orders())
}

/// One stored order.
pub async fn order(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    state
        .orders()
        .order_by_id(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Order not found: {id}")))
}
