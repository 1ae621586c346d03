//! Catalog and address lookups.

use vitrine_core::{ProductFilters, ProductId, format_price};
use vitrine_storefront::state::AppState;

use super::CommandError;
use crate::output;

/// List products matching `filters`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn products(state: &AppState, filters: &ProductFilters) -> Result<(), CommandError> {
    let products = match filters.category.as_deref() {
        Some(category) => state.catalog().get_products_by_category(category).await?,
        None => state.catalog().get_products().await?,
    };

    let listing = filters.apply(&products);
    let rows: Vec<String> = listing
        .iter()
        .map(|p| format!("{:>4}  {:>12}  {}", p.id, format_price(p.price), p.title))
        .collect();
    output::lines(&rows);
    output::line(&format!("{} product(s)", listing.len()));
    Ok(())
}

/// Show one product as JSON.
///
/// # Errors
///
/// Returns an error if the product does not exist or cannot be fetched.
pub async fn product(state: &AppState, id: ProductId) -> Result<(), CommandError> {
    let product = state.catalog().get_product(id).await?;
    output::json(&product)?;
    Ok(())
}

/// List category names.
///
/// # Errors
///
/// Returns an error if the categories cannot be fetched.
pub async fn categories(state: &AppState) -> Result<(), CommandError> {
    let categories = state.catalog().get_categories().await?;
    output::lines(&categories);
    Ok(())
}

/// Resolve a CEP.
///
/// # Errors
///
/// Returns an error for a malformed or unknown CEP, or if the lookup fails.
pub async fn address(state: &AppState, cep: &str) -> Result<(), CommandError> {
    let address = state
        .address()
        .get_address(cep)
        .await?
        .ok_or_else(|| CommandError::NotFound(format!("CEP não encontrado: {cep}")))?;
    output::json(&address)?;
    Ok(())
}
