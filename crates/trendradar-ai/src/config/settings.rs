//! Settings sections of `config.yaml`
//!
//! ```yaml
//! AI:
//!   MODEL: deepseek/deepseek-chat
//!   API_KEY: ""            # falls back to AI_API_KEY
//!   API_BASE: ""
//!   TEMPERATURE: 1.0
//!   MAX_TOKENS: 5000
//!   TIMEOUT: 120
//!   NUM_RETRIES: 2
//!   FALLBACK_MODELS: []
//! TUSHARE:
//!   TOKEN: ""              # falls back to TUSHARE_TOKEN
//! ```

use serde::{Deserialize, Serialize};

use crate::client::{
    ClientConfig, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_NUM_RETRIES, DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT_SECS,
};
use crate::secrets::SecretStore;

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(rename = "AI", default)]
    pub ai: AiSettings,

    #[serde(rename = "TUSHARE", default)]
    pub tushare: TushareSettings,
}

impl ConfigFile {
    /// Parse YAML text; missing sections and keys take their defaults
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Fill blank credentials from `secrets`
    ///
    /// Values present in the file always win.
    pub fn with_secrets(mut self, secrets: &dyn SecretStore) -> Self {
        if self.ai.api_key.is_empty() {
            if let Some(key) = secrets.get("ai") {
                self.ai.api_key = key;
            }
        }
        if self.tushare.token.is_empty() {
            if let Some(token) = secrets.get("tushare") {
                self.tushare.token = token;
            }
        }
        self
    }
}

/// `AI:` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct AiSettings {
    pub model: String,
    pub api_key: String,
    pub api_base: String,
    pub temperature: f64,
    pub max_tokens: i64,
    /// Seconds
    pub timeout: u64,
    pub num_retries: u32,
    pub fallback_models: Vec<String>,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            api_base: String::new(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT_SECS,
            num_retries: DEFAULT_NUM_RETRIES,
            fallback_models: Vec::new(),
        }
    }
}

impl AiSettings {
    /// Build the immutable client configuration
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig::new(self.model.clone())
            .with_api_key(self.api_key.clone())
            .with_api_base(self.api_base.clone())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
            .with_timeout_secs(self.timeout)
            .with_num_retries(self.num_retries)
            .with_fallback_models(self.fallback_models.clone())
    }
}

/// `TUSHARE:` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct TushareSettings {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::MemorySecretStore;

    #[test]
    fn test_parse_full_file() {
        let yaml = r#"
AI:
  MODEL: openai/gpt-4o-mini
  API_KEY: sk-file
  API_BASE: https://gateway.example.com/v1
  TEMPERATURE: 0.7
  MAX_TOKENS: 0
  TIMEOUT: 60
  NUM_RETRIES: 1
  FALLBACK_MODELS:
    - deepseek/deepseek-chat
TUSHARE:
  TOKEN: ts-file
"#;
        let config = ConfigFile::from_yaml(yaml).unwrap();
        assert_eq!(config.ai.model, "openai/gpt-4o-mini");
        assert_eq!(config.ai.temperature, 0.7);
        assert_eq!(config.ai.fallback_models, vec!["deepseek/deepseek-chat".to_string()]);
        assert_eq!(config.tushare.token, "ts-file");

        let client = config.ai.to_client_config();
        assert_eq!(client.api_key(), Some("sk-file"));
        assert_eq!(client.max_tokens(), 0);
        assert_eq!(client.timeout_secs(), 60);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let config = ConfigFile::from_yaml("AI:\n  MODEL: gemini/gemini-2.0-flash\n").unwrap();
        assert_eq!(config.ai.model, "gemini/gemini-2.0-flash");
        assert_eq!(config.ai.max_tokens, 5000);
        assert_eq!(config.ai.num_retries, 2);
        assert!(config.tushare.token.is_empty());

        assert_eq!(ConfigFile::from_yaml("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_secret_fallback() {
        let secrets = MemorySecretStore::new()
            .with("ai", "sk-env")
            .with("tushare", "ts-env");

        let config = ConfigFile::default().with_secrets(&secrets);
        assert_eq!(config.ai.api_key, "sk-env");
        assert_eq!(config.tushare.token, "ts-env");

        let mut file = ConfigFile::default();
        file.ai.api_key = "sk-file".to_string();
        let config = file.with_secrets(&secrets);
        assert_eq!(config.ai.api_key, "sk-file");
    }

    #[test]
    fn test_blank_key_stays_absent() {
        let client = AiSettings::default().to_client_config();
        assert!(client.api_key().is_none());
        assert!(client.api_base().is_none());
        assert!(!client.validate().0);
    }
}
