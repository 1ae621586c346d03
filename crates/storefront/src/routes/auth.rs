//! Login, logout and current-user handlers.

use axum::{Json, extract::State, http::StatusCode};
use tracing::{info, instrument};

use crate::api::{LoginCredentials, User};
use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::middleware::RequireSession;
use crate::state::AppState;

/// Exchange credentials for a token and start a session.
#[instrument(skip(state, credentials), fields(username = %credentials.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Json<User>> {
    let auth = state.auth().login(&credentials).await?;
    let user = state.auth().get_current_user(&auth.token).await?;

    state.session().login(&auth.token, &user)?;
    set_sentry_user(&user.id, Some(&user.email));
    add_breadcrumb("auth", "Logged in", None);
    info!(user_id = %user.id, "User logged in");

    Ok(Json(user))
}

/// End the session. Succeeds whether or not one existed.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Result<StatusCode> {
    state.session().logout()?;
    clear_sentry_user();
    add_breadcrumb("auth", "Logged out", None);
    Ok(StatusCode::NO_CONTENT)
}

/// The signed-in user.
pub async fn me(RequireSession(session): RequireSession) -> Json<User> {
    Json(session.user)
}
