//! Cart route handlers.
//!
//! Every mutation responds with the resulting cart. The store lock is taken
//! only after any upstream call has finished, and held for exactly one
//! store operation.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use vitrine_core::{Cart, ProductId, format_price};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Cart as returned by the API: the stored shape plus a display total.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    #[serde(flatten)]
    pub cart: Cart,
    pub formatted_total: String,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            cart: cart.clone(),
            formatted_total: format_price(cart.total()),
        }
    }
}

/// Quantity of a single product.
#[derive(Debug, Serialize)]
pub struct CartItemStatus {
    pub product_id: ProductId,
    pub quantity: u32,
    pub in_cart: bool,
}

/// Body of `POST /cart/items`.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Body of `PATCH /cart/items/{id}`: exactly one of the two fields.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    /// New absolute quantity; zero or below removes the line.
    pub quantity: Option<i64>,
    /// Change relative to the current quantity.
    pub delta: Option<i64>,
}

/// Current cart.
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let cart = state.cart().cart();
    Json(CartView::from(cart.as_ref()))
}

/// Add a product, fetching its details from the catalog.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartView>> {
    if request.quantity == 0 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_string(),
        ));
    }

    let product = state.catalog().get_product(request.product_id).await?;
    let cart = state.cart().add_to_cart(&product, request.quantity);

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", request.product_id.to_string().as_str())]),
    );
    Ok(Json(CartView::from(cart.as_ref())))
}

/// Quantity of one product.
pub async fn item(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Json<CartItemStatus> {
    let store = state.cart();
    Json(CartItemStatus {
        product_id: id,
        quantity: store.item_quantity(id),
        in_cart: store.is_in_cart(id),
    })
}

/// Set or adjust the quantity of one product.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<CartView>> {
    let cart = match (request.quantity, request.delta) {
        (Some(quantity), None) => state.cart().update_quantity(id, quantity),
        (None, Some(delta)) => state.cart().adjust_quantity(id, delta),
        _ => {
            return Err(AppError::BadRequest(
                "provide exactly one of quantity or delta".to_string(),
            ));
        }
    };

    Ok(Json(CartView::from(cart.as_ref())))
}

/// Remove one product.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Json<CartView> {
    let cart = state.cart().remove_from_cart(id);
    add_breadcrumb(
        "cart",
        "Removed from cart",
        Some(&[("product_id", id.to_string().as_str())]),
    );
    Json(CartView::from(cart.as_ref()))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<CartView> {
    let cart = state.cart().clear_cart();
    Json(CartView::from(cart.as_ref()))
}
