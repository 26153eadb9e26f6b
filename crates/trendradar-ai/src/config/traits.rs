//! Configuration provider trait

use super::settings::ConfigFile;
use crate::secrets::SecretStore;

/// Source of the application settings, implemented by `FileConfigProvider`
pub trait ConfigProvider: Send + Sync {
    /// Settings exactly as stored, without credential fallbacks
    fn config_file(&self) -> ConfigResult<ConfigFile>;

    /// Settings with blank credentials filled from `secrets`
    fn resolve(&self, secrets: &dyn SecretStore) -> ConfigResult<ConfigFile> {
        Ok(self.config_file()?.with_secrets(secrets))
    }
}

/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Other(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
