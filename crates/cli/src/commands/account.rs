//! Sign in and sign out.

use vitrine_storefront::api::LoginCredentials;
use vitrine_storefront::state::AppState;

use super::CommandError;
use crate::output;

/// Log in and store the session.
///
/// # Errors
///
/// Returns an error if the credentials are rejected or the session cannot
/// be stored.
pub async fn login(
    state: &AppState,
    username: String,
    password: String,
) -> Result<(), CommandError> {
    let credentials = LoginCredentials { username, password };
    let auth = state.auth().login(&credentials).await?;
    let user = state.auth().get_current_user(&auth.token).await?;
    state.session().login(&auth.token, &user)?;

    output::line(&format!("Signed in as {}", user.display_name()));
    Ok(())
}

/// Forget the stored session.
///
/// # Errors
///
/// Returns an error if the session cannot be removed.
pub fn logout(state: &AppState) -> Result<(), CommandError> {
    state.session().logout()?;
    output::line("Signed out");
    Ok(())
}
