//! Unified model client
//!
//! `AiClient` resolves its configuration and per-call overrides into a
//! `CompletionRequest`, sends it through a `ChatBackend`, and drives the
//! tool-calling loop: the model requests functions, the executor answers
//! them, and the conversation grows until the model replies in text or the
//! round budget runs out.
//!
//! ```rust,ignore
//! use trendradar_ai::client::{AiClient, ClientConfig, RequestOptions};
//! use trendradar_ai::tushare::{tushare_tools, TushareToolExecutor};
//!
//! let client = AiClient::new(ClientConfig::default().with_api_key(key), logger);
//! let executor = TushareToolExecutor::new(token, logger.clone());
//!
//! let answer = client
//!     .chat_with_tools_default(&messages, &tushare_tools(), &executor, &RequestOptions::new())
//!     .await?;
//! ```

mod config;
mod options;

pub use config::{
    ClientConfig, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_NUM_RETRIES, DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT_SECS,
};
pub use options::RequestOptions;

use std::sync::Arc;

use crate::capability::{CapabilityProbe, FunctionCalling, KnownModelsProbe};
use crate::logging::Logger;
use crate::providers::{ChatBackend, ClientError, ClientResult, CompletionRequest, GenaiBackend};
use crate::tools::{char_prefix, ToolExecutor};
use crate::types::{ChatMessage, Tool, ToolChoice};

/// Round budget used by `chat_with_tools_default`
pub const DEFAULT_MAX_ROUNDS: usize = 30;

/// Characters of each tool result shown in progress output
const PREVIEW_CHARS: usize = 200;

/// Keys the request builder sets itself; passthrough extras never replace them
const RESERVED_KEYS: &[&str] = &[
    "model",
    "messages",
    "temperature",
    "timeout",
    "num_retries",
    "api_key",
    "api_base",
    "max_tokens",
    "fallbacks",
    "tools",
    "tool_choice",
];

/// Multi-provider chat client with a tool-calling loop
pub struct AiClient {
    config: ClientConfig,
    backend: Arc<dyn ChatBackend>,
    probe: Arc<dyn CapabilityProbe>,
    logger: Arc<dyn Logger>,
}

impl AiClient {
    /// Client over the `genai` backend with the built-in capability table
    pub fn new(config: ClientConfig, logger: Arc<dyn Logger>) -> Self {
        let backend = Arc::new(GenaiBackend::new(logger.clone()));
        Self::with_backend(config, backend, logger)
    }

    /// Client over an explicit backend
    pub fn with_backend(
        config: ClientConfig,
        backend: Arc<dyn ChatBackend>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            config,
            backend,
            probe: Arc::new(KnownModelsProbe::new()),
            logger,
        }
    }

    /// Replace the capability probe
    pub fn with_probe(mut self, probe: Arc<dyn CapabilityProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Check the configuration; see `ClientConfig::validate`
    pub fn validate_config(&self) -> (bool, String) {
        self.config.validate()
    }

    /// Resolve configuration and overrides into a request without tools
    pub fn build_request(&self, messages: &[ChatMessage], options: &RequestOptions) -> CompletionRequest {
        let config = &self.config;

        let max_tokens = options.max_tokens.unwrap_or(config.max_tokens());
        let max_tokens = if max_tokens > 0 {
            Some(u32::try_from(max_tokens).unwrap_or(u32::MAX))
        } else {
            None
        };

        let fallbacks = config.fallback_models();
        let fallbacks = if fallbacks.is_empty() {
            None
        } else {
            Some(fallbacks.to_vec())
        };

        let extra = options
            .extra
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        CompletionRequest {
            model: config.model().to_string(),
            messages: messages.to_vec(),
            temperature: options.temperature.unwrap_or(config.temperature()),
            timeout: options.timeout.unwrap_or(config.timeout_secs()),
            num_retries: options.num_retries.unwrap_or(config.num_retries()),
            api_key: config.api_key().map(str::to_string),
            api_base: config.api_base().map(str::to_string),
            max_tokens,
            fallbacks,
            tools: None,
            tool_choice: None,
            extra,
        }
    }

    /// Single completion; returns the first choice's text
    pub async fn chat(&self, messages: &[ChatMessage], options: &RequestOptions) -> ClientResult<String> {
        if messages.is_empty() {
            return Err(ClientError::EmptyConversation);
        }

        let request = self.build_request(messages, options);
        self.complete_text(request).await
    }

    /// Tool-calling loop with the default round budget
    pub async fn chat_with_tools_default(
        &self,
        messages: &[ChatMessage],
        tools: &[Tool],
        executor: &dyn ToolExecutor,
        options: &RequestOptions,
    ) -> ClientResult<String> {
        self.chat_with_tools(messages, tools, executor, DEFAULT_MAX_ROUNDS, options)
            .await
    }

    /// Run the tool-calling loop
    ///
    /// Sends at most `max_rounds + 1` requests. Tool calls within a round are
    /// executed one at a time in the order the model emitted them. When the
    /// budget runs out, one last request without tools asks for a final
    /// answer.
    pub async fn chat_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: &[Tool],
        executor: &dyn ToolExecutor,
        max_rounds: usize,
        options: &RequestOptions,
    ) -> ClientResult<String> {
        if max_rounds == 0 {
            return Err(ClientError::InvalidRounds);
        }
        if messages.is_empty() {
            return Err(ClientError::EmptyConversation);
        }

        let model = self.config.model();
        match self.probe.function_calling(model) {
            FunctionCalling::Supported => {}
            FunctionCalling::Unsupported => {
                self.logger.info(&format!(
                    "[AiClient] {} does not support function calling, falling back to plain chat",
                    model
                ));
                return self.chat(messages, options).await;
            }
            FunctionCalling::Unknown => {
                self.logger.warn(&format!(
                    "[AiClient] cannot tell whether {} supports function calling, trying tools anyway",
                    model
                ));
            }
        }

        let mut conversation = messages.to_vec();
        let mut total_calls = 0usize;

        for round in 1..=max_rounds {
            let mut request = self.build_request(&conversation, options);
            request.tools = Some(tools.to_vec());
            request.tool_choice = Some(ToolChoice::Auto);

            let response = self.backend.complete(request).await?;
            let message = response
                .first_message()
                .ok_or_else(|| ClientError::invalid_response("response has no choices"))?;

            let calls = message.requested_calls().to_vec();
            if calls.is_empty() {
                let content = message.content_or_empty();
                self.logger.info(&format!(
                    "[AiClient] answer after {} round(s), {} tool call(s), {} chars",
                    round,
                    total_calls,
                    content.chars().count()
                ));
                return Ok(content);
            }

            self.logger.info(&format!(
                "[AiClient] round {}: model requested {} tool call(s)",
                round,
                calls.len()
            ));

            conversation.push(ChatMessage::assistant_tool_calls(
                message.content.clone(),
                calls.clone(),
            ));

            for call in calls {
                total_calls += 1;

                let arguments = call.parse_arguments();
                if arguments.is_empty() && !call.arguments.trim().is_empty() {
                    self.logger.debug(&format!(
                        "[AiClient] arguments of {} are not a JSON object, using {{}}: {}",
                        call.name, call.arguments
                    ));
                }
                self.logger.info(&format!(
                    "[AiClient] tool call #{}: {}({})",
                    total_calls,
                    call.name,
                    serde_json::Value::Object(arguments.clone())
                ));

                let result = executor.execute(&call.name, &arguments).await;
                self.log_result(total_calls, &call.name, &result);

                conversation.push(ChatMessage::tool_result(call.id, call.name, result));
            }
        }

        self.logger.warn(&format!(
            "[AiClient] reached {} rounds ({} tool calls), requesting a final answer",
            max_rounds, total_calls
        ));

        let request = self.build_request(&conversation, options);
        self.complete_text(request).await
    }

    async fn complete_text(&self, request: CompletionRequest) -> ClientResult<String> {
        let response = self.backend.complete(request).await?;
        response
            .first_message()
            .map(|m| m.content_or_empty())
            .ok_or_else(|| ClientError::invalid_response("response has no choices"))
    }

    fn log_result(&self, call_number: usize, name: &str, result: &str) {
        let length = result.chars().count();
        self.logger.info(&format!(
            "[AiClient] result #{} ({}): [{} chars] {}",
            call_number,
            name,
            length,
            char_prefix(result, PREVIEW_CHARS)
        ));
        if length > PREVIEW_CHARS {
            self.logger
                .info(&format!("[AiClient] result truncated in log, full length {} chars", length));
        }
    }
}
