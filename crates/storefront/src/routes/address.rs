//! Postal code lookup.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::api::AddressData;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Resolve a CEP to an address. Punctuation in the path is ignored.
#[instrument(skip(state))]
pub async fn lookup(
    State(state): State<AppState>,
    Path(cep): Path<String>,
) -> Result<Json<AddressData>> {
    state
        .address()
        .get_address(&cep)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("CEP não encontrado".to_string()))
}
