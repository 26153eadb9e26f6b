//! Adapter between trendradar-ai types and genai types
//!
//! Conversion functions plus client construction. The explicit credential
//! and base-URL override from the request are applied through genai's
//! resolvers; when no credential is configured genai falls back to its own
//! environment lookup.

use std::future::Future;
use std::pin::Pin;

use genai::chat::{
    ChatMessage as GenaiMessage, ChatOptions as GenaiOptions, ChatResponse as GenaiResponse,
    ContentPart as GenaiPart,
    Tool as GenaiTool, ToolCall as GenaiToolCall, ToolResponse as GenaiToolResponse,
};
use genai::resolver::{AuthData, AuthResolver, Endpoint, ServiceTargetResolver};
use genai::{adapter::AdapterKind, Client, ModelIden, ServiceTarget};
use serde_json::{json, Value};

use crate::logging::Logger;
use crate::types::{ChatMessage, MessageRole, Tool, ToolCall};

use super::error::{ClientError, ClientResult};
use super::request::{CompletionRequest, CompletionResponse, ResponseMessage};

// ============================================================================
// Model identifiers
// ============================================================================

/// Split `provider/model-name` into its parts
///
/// Only the first `/` separates; model names may contain more
/// (`openrouter/anthropic/claude-3.5-sonnet`). Identifiers without a
/// separator have no provider.
pub fn split_model_id(model: &str) -> (Option<&str>, &str) {
    match model.split_once('/') {
        Some((provider, name)) if !provider.is_empty() => (Some(provider), name),
        _ => (None, model),
    }
}

/// Map a provider prefix to the genai adapter that speaks its protocol
pub fn adapter_for_provider(provider: &str) -> Option<AdapterKind> {
    let kind = match provider.to_lowercase().as_str() {
        "openai" => AdapterKind::OpenAI,
        "anthropic" => AdapterKind::Anthropic,
        "gemini" | "google" => AdapterKind::Gemini,
        "ollama" => AdapterKind::Ollama,
        "groq" => AdapterKind::Groq,
        "xai" => AdapterKind::Xai,
        "deepseek" => AdapterKind::DeepSeek,
        "cohere" => AdapterKind::Cohere,
        "fireworks" => AdapterKind::Fireworks,
        "together" => AdapterKind::Together,
        // OpenAI-compatible gateways
        "openrouter" | "mistral" | "dashscope" | "moonshot" | "siliconflow" | "azure"
        | "custom" => AdapterKind::OpenAI,
        _ => return None,
    };
    Some(kind)
}

/// Default endpoint for OpenAI-compatible gateways genai does not know
pub fn compat_endpoint(provider: &str) -> Option<&'static str> {
    match provider.to_lowercase().as_str() {
        "openrouter" => Some("https://openrouter.ai/api/v1/"),
        "mistral" => Some("https://api.mistral.ai/v1/"),
        "dashscope" => Some("https://dashscope.aliyuncs.com/compatible-mode/v1/"),
        "moonshot" => Some("https://api.moonshot.cn/v1/"),
        "siliconflow" => Some("https://api.siliconflow.cn/v1/"),
        _ => None,
    }
}

// ============================================================================
// Message Conversion: trendradar-ai -> genai
// ============================================================================

/// Raw argument text as the JSON value genai expects
fn arguments_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Convert one of our tool calls to genai's
///
/// Built through serde so fields genai adds in later releases stay at their
/// defaults.
pub fn to_genai_tool_call(call: &ToolCall) -> ClientResult<GenaiToolCall> {
    let value = json!({
        "call_id": call.id,
        "fn_name": call.name,
        "fn_arguments": arguments_value(&call.arguments),
    });
    Ok(serde_json::from_value(value)?)
}

/// Convert a ChatMessage to a genai ChatMessage
pub fn to_genai_message(msg: &ChatMessage) -> ClientResult<GenaiMessage> {
    let converted = match msg.role {
        MessageRole::System => GenaiMessage::system(msg.content.clone()),
        MessageRole::User => GenaiMessage::user(msg.content.clone()),
        MessageRole::Assistant if msg.has_tool_calls() => {
            let calls = msg
                .tool_calls
                .iter()
                .map(to_genai_tool_call)
                .collect::<ClientResult<Vec<_>>>()?;
            let mut converted = GenaiMessage::from(calls);
            // text the model sent alongside its calls stays in front of them
            if !msg.content.is_empty() {
                converted.content.prepend(GenaiPart::from_text(msg.content.clone()));
            }
            converted
        }
        MessageRole::Assistant => GenaiMessage::assistant(msg.content.clone()),
        MessageRole::Tool => {
            let call_id = msg.tool_call_id.clone().ok_or_else(|| {
                ClientError::Other("tool message without tool_call_id".to_string())
            })?;
            GenaiMessage::from(GenaiToolResponse::new(call_id, msg.content.clone()))
        }
    };
    Ok(converted)
}

/// Convert a conversation to genai messages
pub fn to_genai_messages(messages: &[ChatMessage]) -> ClientResult<Vec<GenaiMessage>> {
    messages.iter().map(to_genai_message).collect()
}

// ============================================================================
// Tool Conversion: trendradar-ai -> genai
// ============================================================================

/// Convert a Tool to a genai Tool
pub fn to_genai_tool(tool: &Tool) -> GenaiTool {
    GenaiTool::new(tool.name.clone())
        .with_description(tool.description.clone())
        .with_schema(tool.parameters.clone())
}

/// Convert tools to genai tools
pub fn to_genai_tools(tools: &[Tool]) -> Vec<GenaiTool> {
    tools.iter().map(to_genai_tool).collect()
}

// ============================================================================
// Options Conversion: trendradar-ai -> genai
// ============================================================================

/// Build genai ChatOptions from a request
///
/// `top_p` and `stop` passthrough keys are understood; other passthrough
/// keys have no genai equivalent and are reported through `logger`.
pub fn to_genai_options(request: &CompletionRequest, logger: &dyn Logger) -> GenaiOptions {
    let mut opts = GenaiOptions::default().with_temperature(request.temperature);

    if let Some(max_tokens) = request.max_tokens {
        opts = opts.with_max_tokens(max_tokens);
    }

    for (key, value) in &request.extra {
        match (key.as_str(), value) {
            ("top_p", v) if v.is_number() => {
                if let Some(top_p) = v.as_f64() {
                    opts = opts.with_top_p(top_p);
                }
            }
            ("stop", Value::String(s)) => {
                opts = opts.with_stop_sequences(vec![s.clone()]);
            }
            ("stop", Value::Array(items)) => {
                let stops = items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect();
                opts = opts.with_stop_sequences(stops);
            }
            _ => logger.debug(&format!(
                "[GenaiBackend] passthrough key '{}' has no genai mapping, ignored",
                key
            )),
        }
    }

    opts
}

// ============================================================================
// Response Conversion: genai -> trendradar-ai
// ============================================================================

/// Convert a genai ToolCall to ours, keeping arguments as raw text
pub fn from_genai_tool_call(tc: GenaiToolCall) -> ToolCall {
    let arguments = match tc.fn_arguments {
        Value::String(s) => s,
        other => other.to_string(),
    };
    ToolCall {
        id: tc.call_id,
        name: tc.fn_name,
        arguments,
    }
}

/// Convert a genai response into a single-choice response
pub fn from_genai_response(response: GenaiResponse) -> CompletionResponse {
    let content = response.first_text().map(str::to_string);
    let calls: Vec<ToolCall> = response
        .into_tool_calls()
        .into_iter()
        .map(from_genai_tool_call)
        .collect();

    CompletionResponse::from_message(ResponseMessage {
        content,
        tool_calls: (!calls.is_empty()).then_some(calls),
    })
}

// ============================================================================
// Client Creation
// ============================================================================

/// Create a genai Client for one model identifier
pub fn create_client(model: &str, api_key: Option<String>, api_base: Option<String>) -> Client {
    let (provider, _) = split_model_id(model);
    let provider = provider.unwrap_or_default().to_string();

    let auth_resolver = AuthResolver::from_resolver_async_fn(
        move |_model_iden: ModelIden| -> Pin<Box<dyn Future<Output = genai::resolver::Result<Option<AuthData>>> + Send>> {
            let key = api_key.clone();
            Box::pin(async move { Ok(key.map(AuthData::from_single)) })
        },
    );

    let target_resolver = ServiceTargetResolver::from_resolver_fn(
        move |target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
            let ServiceTarget { endpoint, auth, model } = target;

            let adapter_kind = adapter_for_provider(&provider).unwrap_or(model.adapter_kind);
            let endpoint = match (&api_base, compat_endpoint(&provider)) {
                (Some(base), _) => Endpoint::from_owned(base.clone()),
                (None, Some(default)) => Endpoint::from_static(default),
                (None, None) => endpoint,
            };

            Ok(ServiceTarget {
                endpoint,
                auth,
                model: ModelIden::new(adapter_kind, model.model_name.clone()),
            })
        },
    );

    Client::builder()
        .with_auth_resolver(auth_resolver)
        .with_service_target_resolver(target_resolver)
        .build()
}
