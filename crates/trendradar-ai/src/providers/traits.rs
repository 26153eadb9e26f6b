//! Backend trait definition

use async_trait::async_trait;

use super::error::ClientResult;
use super::request::{CompletionRequest, CompletionResponse};

/// A chat-completion backend
///
/// Implementations own the transport: protocol translation, authentication,
/// the per-request timeout and the retry/fallback plan carried by the
/// request. Anything left after those are exhausted is returned as an error.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Backend name for logs (e.g., "genai", "scripted")
    fn name(&self) -> &str;

    /// Execute one logical completion request
    async fn complete(&self, request: CompletionRequest) -> ClientResult<CompletionResponse>;
}
