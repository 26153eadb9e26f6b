//! Request and response objects exchanged with a chat backend

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{ChatMessage, Tool, ToolCall, ToolChoice};

/// A fully resolved chat-completion request
///
/// Optional fields are omitted entirely when unset; a backend never sees an
/// empty-string credential or a zero token cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier, `provider/model-name`
    pub model: String,
    /// Ordered conversation
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: f64,
    /// Per-request timeout in seconds
    pub timeout: u64,
    /// Retries on the same model before moving to a fallback
    pub num_retries: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Models tried in order once the primary model is exhausted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallbacks: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    /// Provider-specific keys forwarded verbatim
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

impl CompletionRequest {
    /// Whether a tool schema is attached
    pub fn has_tools(&self) -> bool {
        self.tools.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// Primary model followed by fallbacks, in the order they are tried
    pub fn model_chain(&self) -> Vec<&str> {
        std::iter::once(self.model.as_str())
            .chain(self.fallbacks.iter().flatten().map(String::as_str))
            .collect()
    }
}

/// Message returned by the model inside a choice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    /// Text content; `None` when the provider returned null
    #[serde(default)]
    pub content: Option<String>,
    /// Requested tool invocations, in emission order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl ResponseMessage {
    /// A plain text answer
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: None,
        }
    }

    /// A tool-requesting answer without text
    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            content: None,
            tool_calls: Some(calls),
        }
    }

    /// Requested tool calls; empty when none were requested
    pub fn requested_calls(&self) -> &[ToolCall] {
        self.tool_calls.as_deref().unwrap_or_default()
    }

    /// Text content, empty string for null
    pub fn content_or_empty(&self) -> String {
        self.content.clone().unwrap_or_default()
    }
}

/// One completion alternative
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

/// A chat-completion response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<Choice>,
    /// Model that actually answered (differs from the request after a fallback)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl CompletionResponse {
    /// Single-choice response wrapping `message`
    pub fn from_message(message: ResponseMessage) -> Self {
        Self {
            choices: vec![Choice { message }],
            model: None,
        }
    }

    /// The first choice's message, if any
    pub fn first_message(&self) -> Option<&ResponseMessage> {
        self.choices.first().map(|c| &c.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "deepseek/deepseek-chat".to_string(),
            messages: vec![ChatMessage::user("hi")],
            temperature: 1.0,
            timeout: 120,
            num_retries: 2,
            api_key: None,
            api_base: None,
            max_tokens: None,
            fallbacks: None,
            tools: None,
            tool_choice: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_optional_fields_omitted() {
        let value = serde_json::to_value(request()).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("api_key"));
        assert!(!obj.contains_key("api_base"));
        assert!(!obj.contains_key("max_tokens"));
        assert!(!obj.contains_key("fallbacks"));
        assert!(!obj.contains_key("tools"));
        assert_eq!(obj["model"], "deepseek/deepseek-chat");
    }

    #[test]
    fn test_extra_flattened() {
        let mut req = request();
        req.extra.insert("top_p".to_string(), json!(0.9));
        let value = serde_json::to_value(req).unwrap();
        assert_eq!(value["top_p"], 0.9);
    }

    #[test]
    fn test_model_chain() {
        let mut req = request();
        assert_eq!(req.model_chain(), vec!["deepseek/deepseek-chat"]);

        req.fallbacks = Some(vec!["openai/gpt-4o-mini".to_string()]);
        assert_eq!(
            req.model_chain(),
            vec!["deepseek/deepseek-chat", "openai/gpt-4o-mini"]
        );
    }

    #[test]
    fn test_response_message_helpers() {
        let msg = ResponseMessage::default();
        assert!(msg.requested_calls().is_empty());
        assert_eq!(msg.content_or_empty(), "");

        let response = CompletionResponse::from_message(ResponseMessage::text("done"));
        assert_eq!(response.first_message().unwrap().content_or_empty(), "done");
        assert!(CompletionResponse::default().first_message().is_none());
    }
}
