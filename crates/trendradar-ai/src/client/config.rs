//! Model client configuration

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat";
pub const DEFAULT_TEMPERATURE: f64 = 1.0;
pub const DEFAULT_MAX_TOKENS: i64 = 5000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_NUM_RETRIES: u32 = 2;

/// Immutable configuration of an `AiClient`
///
/// Built once through the `with_*` methods, then handed to the client.
/// `validate` reports problems without touching the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    model: String,
    api_key: Option<String>,
    api_base: Option<String>,
    temperature: f64,
    max_tokens: i64,
    timeout_secs: u64,
    num_retries: u32,
    fallback_models: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl ClientConfig {
    /// Configuration for `model` with default sampling and transport settings
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            api_base: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            num_retries: DEFAULT_NUM_RETRIES,
            fallback_models: Vec::new(),
        }
    }

    /// Set the API key; an empty key counts as absent
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into()).filter(|k| !k.is_empty());
        self
    }

    /// Set the API base URL; an empty URL counts as absent
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into()).filter(|b| !b.is_empty());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Token cap; zero or negative disables the cap
    pub fn with_max_tokens(mut self, max_tokens: i64) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_num_retries(mut self, retries: u32) -> Self {
        self.num_retries = retries;
        self
    }

    pub fn with_fallback_models(mut self, models: Vec<String>) -> Self {
        self.fallback_models = models.into_iter().filter(|m| !m.is_empty()).collect();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn api_base(&self) -> Option<&str> {
        self.api_base.as_deref()
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn max_tokens(&self) -> i64 {
        self.max_tokens
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn num_retries(&self) -> u32 {
        self.num_retries
    }

    pub fn fallback_models(&self) -> &[String] {
        &self.fallback_models
    }

    /// Check the configuration without any I/O
    ///
    /// Returns `(true, "")` when usable, otherwise `(false, reason)`.
    pub fn validate(&self) -> (bool, String) {
        if self.model.is_empty() {
            return (false, "未配置 AI 模型（model）".to_string());
        }

        if self.api_key.is_none() {
            return (
                false,
                "未配置 AI API Key，请在 config.yaml 或环境变量 AI_API_KEY 中设置".to_string(),
            );
        }

        if !self.model.contains('/') {
            return (
                false,
                format!(
                    "模型格式错误: {}，应为 'provider/model' 格式（如 'deepseek/deepseek-chat'）",
                    self.model
                ),
            );
        }

        (true, String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.model(), "deepseek/deepseek-chat");
        assert_eq!(config.temperature(), 1.0);
        assert_eq!(config.max_tokens(), 5000);
        assert_eq!(config.timeout_secs(), 120);
        assert_eq!(config.num_retries(), 2);
        assert!(config.fallback_models().is_empty());
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let config = ClientConfig::default()
            .with_api_key("")
            .with_api_base("")
            .with_fallback_models(vec![String::new(), "openai/gpt-4o-mini".to_string()]);
        assert!(config.api_key().is_none());
        assert!(config.api_base().is_none());
        assert_eq!(config.fallback_models(), ["openai/gpt-4o-mini".to_string()]);
    }

    #[test]
    fn test_validate_success() {
        let (ok, msg) = ClientConfig::new("deepseek/deepseek-chat")
            .with_api_key("sk-test")
            .validate();
        assert!(ok);
        assert_eq!(msg, "");
    }

    #[test]
    fn test_validate_failures() {
        let (ok, msg) = ClientConfig::new("").with_api_key("sk-test").validate();
        assert!(!ok);
        assert!(!msg.is_empty());

        let (ok, msg) = ClientConfig::new("deepseek/deepseek-chat").validate();
        assert!(!ok);
        assert!(msg.contains("AI_API_KEY"));

        let (ok, msg) = ClientConfig::new("gpt4").with_api_key("sk-test").validate();
        assert!(!ok);
        assert!(msg.contains("gpt4"));
    }
}
