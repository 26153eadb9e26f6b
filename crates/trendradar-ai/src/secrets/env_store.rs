//! Environment variable secret store

use std::collections::HashMap;
use std::env;

use once_cell::sync::Lazy;

use super::traits::SecretStore;

/// Environment variable consulted for the model provider credential
pub const AI_API_KEY_ENV: &str = "AI_API_KEY";

/// Environment variable consulted for the Tushare Pro token
pub const TUSHARE_TOKEN_ENV: &str = "TUSHARE_TOKEN";

/// Mapping from logical secret names to environment variable names
static ENV_VAR_MAP: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("ai", vec![AI_API_KEY_ENV]);
    m.insert("tushare", vec![TUSHARE_TOKEN_ENV]);
    m
});

/// Secret store that reads from environment variables
///
/// Read-only. Logical names map onto the variables the application
/// documents:
/// - `ai` → `AI_API_KEY`
/// - `tushare` → `TUSHARE_TOKEN`
///
/// Variables can also be read directly by their full name.
#[derive(Debug, Default)]
pub struct EnvSecretStore {
    _private: (),
}

impl EnvSecretStore {
    /// Create a new environment variable secret store
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Get the environment variable names for a logical secret name
    pub fn env_vars_for(name: &str) -> Option<&'static [&'static str]> {
        ENV_VAR_MAP.get(name.to_lowercase().as_str()).map(|v| v.as_slice())
    }

    fn read(var: &str) -> Option<String> {
        env::var(var).ok().filter(|v| !v.is_empty())
    }
}

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = Self::read(key) {
            return Some(value);
        }

        Self::env_vars_for(key)?
            .iter()
            .find_map(|var| Self::read(var))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_store_name() {
        let store = EnvSecretStore::new();
        assert_eq!(store.name(), "env");
    }

    #[test]
    fn test_env_store_get_direct() {
        env::set_var("TRENDRADAR_TEST_SECRET_12345", "test_value");

        let store = EnvSecretStore::new();
        assert_eq!(
            store.get("TRENDRADAR_TEST_SECRET_12345"),
            Some("test_value".to_string())
        );

        env::remove_var("TRENDRADAR_TEST_SECRET_12345");
    }

    #[test]
    fn test_env_store_empty_is_absent() {
        env::set_var("TRENDRADAR_TEST_EMPTY_SECRET", "");

        let store = EnvSecretStore::new();
        assert!(!store.has("TRENDRADAR_TEST_EMPTY_SECRET"));

        env::remove_var("TRENDRADAR_TEST_EMPTY_SECRET");
    }

    #[test]
    fn test_env_vars_mapping() {
        assert_eq!(EnvSecretStore::env_vars_for("AI"), Some(&[AI_API_KEY_ENV][..]));
        assert_eq!(
            EnvSecretStore::env_vars_for("tushare"),
            Some(&[TUSHARE_TOKEN_ENV][..])
        );
        assert!(EnvSecretStore::env_vars_for("openai").is_none());
    }

    #[test]
    fn test_env_store_get_not_found() {
        let store = EnvSecretStore::new();
        assert_eq!(store.get("nonexistent_secret_xyz"), None);
        assert!(store.require("nonexistent_secret_xyz").is_err());
    }
}
