//! File-based configuration provider (YAML)
//!
//! Supports an explicit path, the user config directory
//! (~/.config/trendradar/config.yaml) and a workspace's config/config.yaml.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use super::settings::ConfigFile;
use super::traits::{ConfigProvider, ConfigResult};

/// Read-only provider over a `config.yaml`
///
/// A missing file is not an error: it yields the default settings. The
/// parsed file is cached until `reload`.
///
/// # Example
///
/// ```no_run
/// use trendradar_ai::config::{ConfigProvider, FileConfigProvider};
/// use trendradar_ai::secrets::EnvSecretStore;
///
/// let provider = FileConfigProvider::workspace("/path/to/trendradar");
/// let config = provider.resolve(&EnvSecretStore::new()).unwrap();
/// let client_config = config.ai.to_client_config();
/// ```
#[derive(Debug)]
pub struct FileConfigProvider {
    path: PathBuf,
    cache: RwLock<Option<ConfigFile>>,
}

impl FileConfigProvider {
    /// Provider for a specific path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    /// User-level config (~/.config/trendradar/config.yaml)
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("trendradar").join("config.yaml"))
    }

    /// Workspace-level config (config/config.yaml)
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        Self::new(workspace_root.as_ref().join("config").join("config.yaml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ConfigResult<ConfigFile> {
        if !self.path.exists() {
            return Ok(ConfigFile::default());
        }

        let content = fs::read_to_string(&self.path)?;
        Ok(ConfigFile::from_yaml(&content)?)
    }

    /// Re-read the file, replacing the cache
    pub fn reload(&self) -> ConfigResult<ConfigFile> {
        let config = self.load()?;
        *self.cache.write() = Some(config.clone());
        Ok(config)
    }
}

impl ConfigProvider for FileConfigProvider {
    fn config_file(&self) -> ConfigResult<ConfigFile> {
        if let Some(config) = self.cache.read().as_ref() {
            return Ok(config.clone());
        }
        self.reload()
    }
}
