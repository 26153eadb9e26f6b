//! Client error types

use thiserror::Error;

/// Errors that can occur while talking to a model provider
#[derive(Error, Debug)]
pub enum ClientError {
    /// `chat` was called without any messages
    #[error("conversation must contain at least one message")]
    EmptyConversation,

    /// `chat_with_tools` was called with a zero round budget
    #[error("max_rounds must be at least 1")]
    InvalidRounds,

    /// The provider rejected the request or the call failed in transit
    #[error("{model} request failed: {message}")]
    Provider { model: String, message: String },

    /// A single request exceeded its timeout
    #[error("{model} request timed out after {secs}s")]
    Timeout { model: String, secs: u64 },

    /// The provider answered with something unusable
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// JSON conversion error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ClientError {
    /// Create a provider error
    pub fn provider(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            model: model.into(),
            message: message.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
