//! Function-calling capability detection
//!
//! The tool-calling loop asks a `CapabilityProbe` before sending any tool
//! schema. `Unsupported` routes to plain chat; `Unknown` is reported but the
//! loop still tries the tool path.

use crate::providers::split_model_id;

/// Whether a model supports function calling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionCalling {
    Supported,
    Unsupported,
    /// The probe could not decide (malformed id, unknown provider or model)
    Unknown,
}

/// Capability lookup by model identifier
pub trait CapabilityProbe: Send + Sync {
    fn function_calling(&self, model: &str) -> FunctionCalling;
}

/// Probe that answers the same for every model
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe(pub FunctionCalling);

impl CapabilityProbe for StaticProbe {
    fn function_calling(&self, _model: &str) -> FunctionCalling {
        self.0
    }
}

/// Model-name prefixes known NOT to support function calling, per provider
const UNSUPPORTED: &[(&str, &[&str])] = &[
    ("deepseek", &["deepseek-reasoner"]),
    ("openai", &["o1-mini", "o1-preview", "gpt-3.5-turbo-instruct", "text-", "davinci", "babbage"]),
    ("anthropic", &["claude-instant", "claude-2"]),
    ("gemini", &["gemini-pro-vision", "gemini-1.0-pro-vision"]),
    ("ollama", &[""]),
];

/// Providers whose chat models support function calling unless listed above
const SUPPORTED_PROVIDERS: &[&str] = &[
    "openai",
    "anthropic",
    "gemini",
    "google",
    "deepseek",
    "groq",
    "xai",
    "mistral",
    "cohere",
    "fireworks",
    "together",
    "openrouter",
    "dashscope",
    "moonshot",
    "siliconflow",
    "azure",
];

/// Table-driven probe over well-known providers and models
#[derive(Debug, Clone, Copy, Default)]
pub struct KnownModelsProbe;

impl KnownModelsProbe {
    pub fn new() -> Self {
        Self
    }
}

impl CapabilityProbe for KnownModelsProbe {
    fn function_calling(&self, model: &str) -> FunctionCalling {
        let (provider, name) = match split_model_id(model) {
            (Some(provider), name) if !name.is_empty() => (provider.to_lowercase(), name.to_lowercase()),
            _ => return FunctionCalling::Unknown,
        };

        let unsupported = UNSUPPORTED
            .iter()
            .filter(|(p, _)| *p == provider)
            .flat_map(|(_, prefixes)| prefixes.iter())
            .any(|prefix| name.starts_with(prefix));
        if unsupported {
            return FunctionCalling::Unsupported;
        }

        if SUPPORTED_PROVIDERS.contains(&provider.as_str()) {
            FunctionCalling::Supported
        } else {
            FunctionCalling::Unknown
        }
    }
}
