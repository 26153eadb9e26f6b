//! Core traits and types for secret lookup

use thiserror::Error;

/// Errors that can occur during secret store operations
#[derive(Error, Debug)]
pub enum SecretStoreError {
    #[error("Store is read-only")]
    ReadOnly,

    #[error("Secret not found: {0}")]
    NotFound(String),
}

pub type SecretStoreResult<T> = Result<T, SecretStoreError>;

/// Trait for secret lookup
///
/// Implementations:
/// - Environment variables (`EnvSecretStore`)
/// - In-memory for testing (`MemorySecretStore`)
///
/// # Example
///
/// ```
/// use trendradar_ai::secrets::{SecretStore, EnvSecretStore};
///
/// let store = EnvSecretStore::new();
/// // store.get("ai") will check AI_API_KEY
/// let _ = store.get("ai");
/// ```
pub trait SecretStore: Send + Sync {
    /// Human-readable name of this store
    fn name(&self) -> &str;

    /// Retrieve a secret by key
    ///
    /// The key can be:
    /// - A logical name (e.g., "ai", "tushare") mapped to the matching env var
    /// - A direct key (e.g., "AI_API_KEY")
    ///
    /// Empty values count as absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Retrieve a secret, failing when it is absent
    fn require(&self, key: &str) -> SecretStoreResult<String> {
        self.get(key)
            .ok_or_else(|| SecretStoreError::NotFound(key.to_string()))
    }

    /// Check if a secret exists
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
