//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use vitrine_core::{Product, ProductFilters, ProductId};

use crate::error::Result;
use crate::state::AppState;

/// List products, filtered and sorted by the query string.
///
/// A `category` filter is served from the upstream category endpoint; the
/// remaining filters run locally.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(filters): Query<ProductFilters>,
) -> Result<Json<Vec<Product>>> {
    let products = match filters.category.as_deref() {
        Some(category) => state.catalog().get_products_by_category(category).await?,
        None => state.catalog().get_products().await?,
    };

    Ok(Json(filters.apply(&products)))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    Ok(Json(state.catalog().get_product(id).await?))
}

/// Category names.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let categories = state.catalog().get_categories().await?;
    Ok(Json(Vec::clone(&categories)))
}
