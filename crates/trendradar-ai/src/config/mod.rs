//! Configuration
//!
//! Settings come from a `config.yaml` with an `AI:` and a `TUSHARE:` section:
//! `FileConfigProvider` reads it from an explicit path, the user config
//! directory or a workspace's `config/` directory. The file is never written.
//!
//! Credentials left blank in the file are filled from a `SecretStore`
//! (normally `EnvSecretStore`, i.e. `AI_API_KEY` / `TUSHARE_TOKEN`).

mod traits;
mod settings;
mod file;

pub use traits::{ConfigProvider, ConfigError, ConfigResult};
pub use settings::{ConfigFile, AiSettings, TushareSettings};
pub use file::FileConfigProvider;
