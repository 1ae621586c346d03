//! Signed-in user session kept in local storage.
//!
//! A session is the pair of [`AUTH_TOKEN_KEY`] (raw bearer token) and
//! [`USER_DATA_KEY`] (serialized [`User`]). Both must be present and
//! readable for the session to count.
//!
//! Login writes the user before the token and logout removes the token
//! first, so a token never exists without its user. A user record without
//! a token only means signed out. Restore purges the keys only when a token
//! has no user or the user record is unreadable.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::api::User;
use crate::storage::{self, KeyValueStorage, StorageError};

/// Storage key holding the bearer token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Storage key holding the signed-in user.
pub const USER_DATA_KEY: &str = "user_data";

/// A restored session.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub token: SecretString,
    pub user: User,
}

/// Login state over a [`KeyValueStorage`].
///
/// Clones share one lock, so login, logout and restore never interleave
/// within a process.
#[derive(Clone)]
pub struct AuthSession {
    storage: Arc<dyn KeyValueStorage>,
    guard: Arc<Mutex<()>>,
}

impl AuthSession {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            guard: Arc::new(Mutex::new(())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.guard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if either key cannot be written.
    pub fn login(&self, token: &SecretString, user: &User) -> Result<(), StorageError> {
        let _guard = self.lock();
        storage::write_json(self.storage.as_ref(), USER_DATA_KEY, user)?;
        self.storage.set(AUTH_TOKEN_KEY, token.expose_secret())?;
        info!(user_id = %user.id, "Session started");
        Ok(())
    }

    /// Forget the session.
    ///
    /// # Errors
    ///
    /// Returns an error if either key cannot be removed.
    pub fn logout(&self) -> Result<(), StorageError> {
        let _guard = self.lock();
        self.clear()
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(AUTH_TOKEN_KEY)?;
        self.storage.remove(USER_DATA_KEY)?;
        debug!("Session cleared");
        Ok(())
    }

    /// The stored session, if complete and readable.
    ///
    /// A token without a user, or an unreadable session, is removed.
    #[must_use]
    pub fn restore(&self) -> Option<SessionUser> {
        let _guard = self.lock();
        let token = self.storage.get(AUTH_TOKEN_KEY);
        let user = storage::read_json::<User>(self.storage.as_ref(), USER_DATA_KEY);

        match (token, user) {
            (Ok(Some(token)), Ok(Some(user))) => Some(SessionUser {
                token: SecretString::from(token),
                user,
            }),
            (Ok(None), Ok(_)) => None,
            (token, user) => {
                warn!(
                    token_present = matches!(token, Ok(Some(_))),
                    user_error = ?user.as_ref().err(),
                    "Discarding incomplete session"
                );
                if let Err(e) = self.clear() {
                    warn!(error = %e, "Failed to clear incomplete session");
                }
                None
            }
        }
    }

    /// The stored token, if a complete session exists.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.restore().map(|session| session.token)
    }

    /// Whether a complete session exists.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.restore().is_some()
    }
}
