//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{KeyValueStorage, StorageError};

/// Process-local storage.
///
/// With a quota, the combined size of all keys and values may not exceed
/// the given number of bytes, the way browser storage refuses writes once
/// its budget is spent.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that refuses writes beyond `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: RwLock::default(),
            quota: Some(bytes),
        }
    }

    /// Bytes currently used by keys and values.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}
