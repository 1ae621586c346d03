//! Key-value storage for client-side state.
//!
//! The storefront keeps its cart, order history and auth session in a small
//! string-to-string store, one JSON document per key. Two backends exist:
//!
//! - [`MemoryStorage`] - process-local, optionally with a byte quota
//! - [`FileStorage`] - one `<key>.json` file per key inside a directory
//!
//! # Keys
//!
//! | key | contents |
//! |---|---|
//! | `ecommerce_cart` | serialized [`vitrine_core::Cart`] |
//! | `orders` | JSON array of [`vitrine_core::Order`] |
//! | `auth_token` | bearer token (raw string) |
//! | `user_data` | serialized [`crate::api::User`] |

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing would exceed the configured quota.
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} bytes allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Key contains characters the backend cannot store.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Value could not be encoded or decoded as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A synchronous string key-value store.
///
/// Implementations must be safe to share across threads; every call is a
/// complete read or write of a single key.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written or is full.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON value.
///
/// # Errors
///
/// Returns an error if the key cannot be read or does not hold valid JSON
/// for `T`.
pub fn read_json<T: DeserializeOwned>(
    storage: &dyn KeyValueStorage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    storage
        .get(key)?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(StorageError::from)
}

/// Encode and write a JSON value.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_json<T: Serialize + ?Sized>(
    storage: &dyn KeyValueStorage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_json_helpers_round_trip() {
        let storage = MemoryStorage::new();
        write_json(&storage, "numbers", &vec![1, 2, 3]).unwrap();
        let numbers: Option<Vec<i32>> = read_json(&storage, "numbers").unwrap();
        assert_eq!(numbers, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_read_json_absent_key() {
        let storage = MemoryStorage::new();
        let value: Option<Vec<i32>> = read_json(&storage, "missing").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_read_json_rejects_garbage() {
        let storage = MemoryStorage::new();
        storage.set("numbers", "not json").unwrap();
        let result: Result<Option<Vec<i32>>, _> = read_json(&storage, "numbers");
        assert!(matches!(result, Err(StorageError::Json(_))));
    }

    #[test]
    fn test_error_display() {
        let err = StorageError::QuotaExceeded {
            needed: 20,
            quota: 10,
        };
        assert_eq!(
            err.to_string(),
            "Storage quota exceeded: 20 bytes needed, 10 bytes allowed"
        );
    }
}
