//! Request and response types for the upstream services.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use vitrine_core::UserId;

/// Username and password for `/auth/login`.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Raw `/auth/login` response.
#[derive(Deserialize)]
pub(crate) struct AuthResponseBody {
    pub token: String,
}

/// A successful login.
#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub token: SecretString,
}

/// A user's display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserName {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
}

/// A storefront user as returned by `/users/{id}`.
///
/// Fields the storefront does not use (including the upstream's password
/// field) are dropped during decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub name: UserName,
    #[serde(default)]
    pub phone: String,
}

impl User {
    /// First and last name, or the username when both are empty.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.name.firstname, self.name.lastname);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// An address resolved from a postal code.
///
/// Field names on the wire follow the lookup service (`logradouro`,
/// `bairro`, `localidade`, `uf`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressData {
    pub cep: String,
    #[serde(rename = "logradouro", default)]
    pub street: String,
    #[serde(rename = "complemento", default)]
    pub complement: String,
    #[serde(rename = "bairro", default)]
    pub neighborhood: String,
    #[serde(rename = "localidade", default)]
    pub city: String,
    #[serde(rename = "uf", default)]
    pub state: String,
    #[serde(default)]
    pub ibge: String,
    #[serde(default)]
    pub ddd: String,
}
