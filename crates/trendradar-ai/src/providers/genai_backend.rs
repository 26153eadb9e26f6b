//! GenaiBackend - chat backend using the genai crate
//!
//! Handles every genai-supported provider plus OpenAI-compatible gateways.
//! Owns the retry/fallback plan: the primary model is tried
//! `num_retries + 1` times, then each fallback model the same way.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use genai::chat::ChatRequest;

use crate::logging::Logger;

use super::error::{ClientError, ClientResult};
use super::genai_adapter::{
    create_client, from_genai_response, split_model_id, to_genai_messages, to_genai_options,
    to_genai_tools,
};
use super::request::{CompletionRequest, CompletionResponse};
use super::traits::ChatBackend;

/// Model identifiers to attempt for a request, in order
///
/// Lazy: each model yields `num_retries + 1` times without materializing
/// the sequence.
pub fn attempt_plan(request: &CompletionRequest) -> impl Iterator<Item = &str> + '_ {
    let retries = request.num_retries;
    request
        .model_chain()
        .into_iter()
        .flat_map(move |model| (0..=retries).map(move |_| model))
}

/// Total number of attempts in the plan
pub fn attempt_count(request: &CompletionRequest) -> u64 {
    (u64::from(request.num_retries) + 1) * request.model_chain().len() as u64
}

/// Chat backend using genai for all supported LLM APIs
pub struct GenaiBackend {
    logger: Arc<dyn Logger>,
}

impl GenaiBackend {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }

    async fn attempt(
        &self,
        model: &str,
        chat_req: ChatRequest,
        request: &CompletionRequest,
    ) -> ClientResult<CompletionResponse> {
        let client = create_client(model, request.api_key.clone(), request.api_base.clone());
        let options = to_genai_options(request, self.logger.as_ref());
        let (_, model_name) = split_model_id(model);

        let call = client.exec_chat(model_name, chat_req, Some(&options));
        let result = if request.timeout == 0 {
            call.await
        } else {
            tokio::time::timeout(Duration::from_secs(request.timeout), call)
                .await
                .map_err(|_| ClientError::Timeout {
                    model: model.to_string(),
                    secs: request.timeout,
                })?
        };

        let response = result.map_err(|e| ClientError::provider(model, e.to_string()))?;
        let mut converted = from_genai_response(response);
        converted.model = Some(model.to_string());
        Ok(converted)
    }
}

#[async_trait]
impl ChatBackend for GenaiBackend {
    fn name(&self) -> &str {
        "genai"
    }

    async fn complete(&self, request: CompletionRequest) -> ClientResult<CompletionResponse> {
        let mut chat_req = ChatRequest::new(to_genai_messages(&request.messages)?);
        if let Some(tools) = request.tools.as_deref().filter(|t| !t.is_empty()) {
            chat_req = chat_req.with_tools(to_genai_tools(tools));
        }
        if let Some(choice) = request.tool_choice {
            // genai leaves tool choice to the provider default, which is "auto"
            self.logger.debug(&format!("[GenaiBackend] tool_choice={:?}", choice));
        }

        let total = attempt_count(&request);
        let mut last_error = None;

        for (i, model) in attempt_plan(&request).enumerate() {
            self.logger.debug(&format!(
                "[GenaiBackend] attempt {}/{}: model={}",
                i + 1,
                total,
                model
            ));

            match self.attempt(model, chat_req.clone(), &request).await {
                Ok(response) => {
                    if model != request.model {
                        self.logger.warn(&format!(
                            "[GenaiBackend] answered by fallback model {}",
                            model
                        ));
                    }
                    return Ok(response);
                }
                Err(e) => {
                    self.logger.warn(&format!(
                        "[GenaiBackend] attempt {}/{} failed: {}",
                        i + 1,
                        total,
                        e
                    ));
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ClientError::Other("empty attempt plan".to_string())))
    }
}
