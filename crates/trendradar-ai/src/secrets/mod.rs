//! Secret lookup
//!
//! Credentials may live in the config file or in the environment. The
//! config loader asks a `SecretStore` whenever the file leaves a credential
//! blank.

mod traits;
mod env_store;
mod memory_store;

pub use traits::{SecretStore, SecretStoreError, SecretStoreResult};
pub use env_store::{EnvSecretStore, AI_API_KEY_ENV, TUSHARE_TOKEN_ENV};
pub use memory_store::MemorySecretStore;
