//! TrendRadar AI
//!
//! Multi-provider chat client with a tool-calling loop.
//! Models are addressed as `provider/model-name` (for example
//! `deepseek/deepseek-chat`); the `genai` crate speaks each provider's
//! protocol.
//!
//! ## Tool Calling
//!
//! `AiClient::chat_with_tools` offers tool definitions to the model, runs the
//! calls it requests through a `ToolExecutor`, feeds the results back and
//! repeats until the model answers in text or the round budget runs out.
//! The `tushare` module provides a ready-made executor over Tushare Pro
//! market data:
//!
//! ```rust,ignore
//! use trendradar_ai::{AiClient, ChatMessage, ConsoleLogger, RequestOptions};
//! use trendradar_ai::config::{ConfigProvider, FileConfigProvider};
//! use trendradar_ai::secrets::EnvSecretStore;
//! use trendradar_ai::tushare::{tushare_tools, TushareToolExecutor};
//!
//! let logger = Arc::new(ConsoleLogger::new());
//! let config = FileConfigProvider::workspace(".").resolve(&EnvSecretStore::new())?;
//!
//! let client = AiClient::new(config.ai.to_client_config(), logger.clone());
//! let executor = TushareToolExecutor::new(config.tushare.token, logger);
//!
//! let answer = client
//!     .chat_with_tools_default(
//!         &[ChatMessage::user("今天哪些概念板块领涨？")],
//!         &tushare_tools(),
//!         &executor,
//!         &RequestOptions::new(),
//!     )
//!     .await?;
//! ```

pub mod types;
pub mod secrets;
pub mod logging;
pub mod config;
pub mod providers;
pub mod capability;
pub mod tools;
pub mod client;
pub mod tushare;

// Re-export commonly used types
pub use types::{ChatMessage, MessageRole, Tool, ToolCall, ToolChoice};

pub use secrets::{SecretStore, SecretStoreError, EnvSecretStore, MemorySecretStore};

pub use logging::{Logger, NoOpLogger, ConsoleLogger, RecordingLogger};

pub use config::{ConfigProvider, ConfigFile, AiSettings, TushareSettings, FileConfigProvider};

pub use providers::{
    ChatBackend, ClientError, ClientResult,
    CompletionRequest, CompletionResponse,
    GenaiBackend, ScriptedBackend, MockReply,
};

pub use capability::{CapabilityProbe, FunctionCalling, KnownModelsProbe, StaticProbe};

pub use tools::{ToolExecutor, ToolRegistry, FnExecutor};

pub use client::{AiClient, ClientConfig, RequestOptions, DEFAULT_MAX_ROUNDS};

pub use tushare::{tushare_tools, TushareToolExecutor, TushareFunction, QuerySource, Frame};
