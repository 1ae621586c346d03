//! Cart commands.

use vitrine_core::ProductId;
use vitrine_storefront::state::AppState;

use super::CommandError;
use crate::output;

/// Print the cart.
pub fn show(state: &AppState) {
    output::cart(&state.cart().cart());
}

/// Fetch a product and add it to the cart.
///
/// # Errors
///
/// Returns an error if the product cannot be fetched.
pub async fn add(state: &AppState, id: ProductId, quantity: u32) -> Result<(), CommandError> {
    let product = state.catalog().get_product(id).await?;
    let cart = state.cart().add_to_cart(&product, quantity);
    output::cart(&cart);
    Ok(())
}

/// Remove a product from the cart.
pub fn remove(state: &AppState, id: ProductId) {
    output::cart(&state.cart().remove_from_cart(id));
}

/// Set the quantity of a product.
pub fn update(state: &AppState, id: ProductId, quantity: i64) {
    output::cart(&state.cart().update_quantity(id, quantity));
}

/// Empty the cart.
pub fn clear(state: &AppState) {
    output::cart(&state.cart().clear_cart());
}
