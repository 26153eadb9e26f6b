//! In-memory secret store

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::SecretStore;

/// In-memory secret store for tests and embedding applications
///
/// Keys are matched exactly. Empty values count as absent, same as the
/// environment store.
///
/// # Example
///
/// ```
/// use trendradar_ai::secrets::{SecretStore, MemorySecretStore};
///
/// let store = MemorySecretStore::new().with("ai", "sk-test");
/// assert_eq!(store.get("ai"), Some("sk-test".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a secret
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.secrets.write().insert(key.into(), value.into());
    }

    /// Remove a secret
    pub fn remove(&self, key: &str) {
        self.secrets.write().remove(key);
    }
}

impl SecretStore for MemorySecretStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.secrets
            .read()
            .get(key)
            .filter(|v| !v.is_empty())
            .cloned()
    }
}
