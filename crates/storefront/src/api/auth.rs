//! Login and user lookup client.

use secrecy::SecretString;
use tracing::{info, instrument};
use vitrine_core::UserId;

use super::ApiError;
use super::client::{ApiClient, parse_json};
use super::types::{AuthResponse, AuthResponseBody, LoginCredentials, User};

/// Client for `/auth/login` and `/users`.
#[derive(Debug, Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with 401 for bad credentials, or another
    /// error if the request fails.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, ApiError> {
        let body: AuthResponseBody = self.api.post_json("/auth/login", credentials).await?;
        info!("Login accepted");
        Ok(AuthResponse {
            token: SecretString::from(body.token),
        })
    }

    /// The user the token belongs to.
    ///
    /// The upstream has no "current user" endpoint, so this resolves to
    /// user 1 with the token attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn get_current_user(&self, token: &SecretString) -> Result<User, ApiError> {
        let body = self.api.get_text("/users/1", Some(token)).await?;
        parse_json(&body)
    }

    /// All users.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_users(&self) -> Result<Vec<User>, ApiError> {
        self.api.get_json("/users").await
    }

    /// A single user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: UserId) -> Result<User, ApiError> {
        self.api.get_json(&format!("/users/{id}")).await
    }
}
