//! Scripted backend for testing
//!
//! Returns canned replies without network access and records every request
//! it receives, so tests can count model calls and inspect the conversation
//! the client sent.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{ClientError, ClientResult};
use super::request::{CompletionRequest, CompletionResponse, ResponseMessage};
use super::traits::ChatBackend;
use crate::logging::Logger;
use crate::types::{MessageRole, ToolCall};

/// One canned backend reply
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Plain text answer
    Text(String),
    /// Answer with null content and no tool calls
    Null,
    /// Tool-call request
    ToolCalls(Vec<ToolCall>),
    /// Transport/provider failure
    Error(String),
}

impl MockReply {
    /// Shorthand for a single tool call
    pub fn call(id: &str, name: &str, arguments: &str) -> Self {
        MockReply::ToolCalls(vec![ToolCall::new(id, name, arguments)])
    }
}

/// Reply selection mode
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Echo back the last user message
    Echo,
    /// Return the same reply every time
    Fixed(MockReply),
    /// Pop replies in order; an exhausted script is an error
    Script,
}

/// Scripted chat backend for tests
pub struct ScriptedBackend {
    mode: MockMode,
    script: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<CompletionRequest>>,
    logger: Arc<dyn Logger>,
}

impl ScriptedBackend {
    fn with_mode(mode: MockMode, script: Vec<MockReply>, logger: Arc<dyn Logger>) -> Self {
        Self {
            mode,
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            logger,
        }
    }

    /// Replies in order
    pub fn new(script: Vec<MockReply>, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Script, script, logger)
    }

    /// Same reply for every request
    pub fn fixed(reply: MockReply, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Fixed(reply), Vec::new(), logger)
    }

    /// Echo the last user message
    pub fn echo(logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Echo, Vec::new(), logger)
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn next_reply(&self, request: &CompletionRequest) -> Option<MockReply> {
        match &self.mode {
            MockMode::Echo => {
                let last_user = request
                    .messages
                    .iter()
                    .rev()
                    .find(|m| m.role == MessageRole::User)
                    .map(|m| m.content.clone())
                    .unwrap_or_else(|| "Hello from ScriptedBackend!".to_string());
                Some(MockReply::Text(format!("Echo: {}", last_user)))
            }
            MockMode::Fixed(reply) => Some(reply.clone()),
            MockMode::Script => self.script.lock().pop_front(),
        }
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> ClientResult<CompletionResponse> {
        let reply = self.next_reply(&request);
        self.requests.lock().push(request);
        self.logger.debug(&format!("ScriptedBackend: reply {:?}", reply));

        let message = match reply {
            Some(MockReply::Text(text)) => ResponseMessage::text(text),
            Some(MockReply::Null) => ResponseMessage::default(),
            Some(MockReply::ToolCalls(calls)) => ResponseMessage::tool_calls(calls),
            Some(MockReply::Error(message)) => {
                return Err(ClientError::provider("scripted", message));
            }
            None => return Err(ClientError::Other("mock script exhausted".to_string())),
        };

        Ok(CompletionResponse::from_message(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::types::ChatMessage;
    use serde_json::Map;

    fn test_logger() -> Arc<dyn Logger> {
        Arc::new(NoOpLogger::new())
    }

    fn request(content: &str) -> CompletionRequest {
        CompletionRequest {
            model: "mock/echo".to_string(),
            messages: vec![ChatMessage::user(content)],
            temperature: 1.0,
            timeout: 0,
            num_retries: 0,
            api_key: None,
            api_base: None,
            max_tokens: None,
            fallbacks: None,
            tools: None,
            tool_choice: None,
            extra: Map::new(),
        }
    }

    #[tokio::test]
    async fn test_echo_mode() {
        let backend = ScriptedBackend::echo(test_logger());
        let response = backend.complete(request("Hello, world!")).await.unwrap();
        let text = response.first_message().unwrap().content_or_empty();
        assert_eq!(text, "Echo: Hello, world!");
    }

    #[tokio::test]
    async fn test_script_mode_in_order() {
        let backend = ScriptedBackend::new(
            vec![
                MockReply::call("c1", "get_index_daily", "{}"),
                MockReply::Text("done".to_string()),
            ],
            test_logger(),
        );

        let first = backend.complete(request("a")).await.unwrap();
        assert_eq!(first.first_message().unwrap().requested_calls().len(), 1);

        let second = backend.complete(request("b")).await.unwrap();
        assert_eq!(second.first_message().unwrap().content_or_empty(), "done");

        assert!(backend.complete(request("c")).await.is_err());
        assert_eq!(backend.request_count(), 3);
    }

    #[tokio::test]
    async fn test_error_and_null_replies() {
        let backend = ScriptedBackend::new(
            vec![MockReply::Error("rate limited".to_string()), MockReply::Null],
            test_logger(),
        );

        let err = backend.complete(request("a")).await.unwrap_err();
        assert!(err.to_string().contains("rate limited"));

        let response = backend.complete(request("b")).await.unwrap();
        assert_eq!(response.first_message().unwrap().content, None);
    }

    #[tokio::test]
    async fn test_fixed_mode_repeats() {
        let backend = ScriptedBackend::fixed(MockReply::Text("same".to_string()), test_logger());
        for _ in 0..3 {
            let response = backend.complete(request("x")).await.unwrap();
            assert_eq!(response.first_message().unwrap().content_or_empty(), "same");
        }
        assert_eq!(backend.requests()[2].messages[0].content, "x");
    }
}
