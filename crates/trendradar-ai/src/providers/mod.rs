//! Chat backends
//!
//! A backend turns a resolved `CompletionRequest` into provider calls.
//!
//! ## Architecture
//!
//! `GenaiBackend` uses the `genai` crate, which handles the protocols of
//! OpenAI, Anthropic, Gemini, DeepSeek, Ollama and others. OpenAI-compatible
//! gateways (OpenRouter, DashScope, Moonshot, ...) are routed through genai's
//! `ServiceTargetResolver`. The backend also carries out the retry/fallback
//! plan encoded in each request.
//!
//! `ScriptedBackend` is kept for testing.

mod traits;
mod error;
mod request;
mod genai_adapter;
mod genai_backend;
mod mock;

pub use traits::ChatBackend;
pub use error::{ClientError, ClientResult};
pub use request::{Choice, CompletionRequest, CompletionResponse, ResponseMessage};

pub use genai_adapter::{adapter_for_provider, split_model_id};
pub use genai_backend::{attempt_count, attempt_plan, GenaiBackend};

pub use mock::{MockMode, MockReply, ScriptedBackend};
