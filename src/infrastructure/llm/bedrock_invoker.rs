use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{LlmInvoker, LlmInvokerError};
use crate::domain::{ExtractionPrompt, ModelParams, ModelResponse};

use super::inference_endpoint::{InferenceEndpoint, InferenceError};
use super::model_family::ModelFamily;

/// Dispatches a prompt through the model family resolved from the model-id
/// prefix and normalizes the response envelope back into raw text.
pub struct BedrockInvoker {
    endpoint: Arc<dyn InferenceEndpoint>,
}

impl BedrockInvoker {
    pub fn new(endpoint: Arc<dyn InferenceEndpoint>) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl LlmInvoker for BedrockInvoker {
    async fn invoke(
        &self,
        prompt: &ExtractionPrompt,
        params: &ModelParams,
    ) -> Result<ModelResponse, LlmInvokerError> {
        let family = ModelFamily::resolve(&params.model_id)
            .ok_or_else(|| LlmInvokerError::UnsupportedModel(params.model_id.clone()))?;

        if !prompt.images.is_empty() && !family.supports_vision() {
            return Err(LlmInvokerError::UnsupportedModel(format!(
                "{} does not accept image input ({})",
                family.as_str(),
                params.model_id
            )));
        }

        tracing::debug!(
            model_id = %params.model_id,
            family = family.as_str(),
            images = prompt.images.len(),
            "Invoking model"
        );

        let body = family.build_request(prompt, params);
        let envelope = self
            .endpoint
            .invoke(&params.model_id, body)
            .await
            .map_err(|e| match e {
                InferenceError::Throttled => LlmInvokerError::Throttled,
                InferenceError::Timeout => LlmInvokerError::Timeout,
                InferenceError::ServiceError { status, message } => {
                    LlmInvokerError::ServiceError(format!("{status}: {message}"))
                }
                InferenceError::Rejected { status, message } => {
                    LlmInvokerError::Rejected(format!("{status}: {message}"))
                }
                InferenceError::Transport(message) => LlmInvokerError::Transport(message),
            })?;

        let raw_text = family.extract_generated_text(&envelope).ok_or_else(|| {
            LlmInvokerError::InvalidResponse(format!(
                "no generated text in {} response envelope",
                family.as_str()
            ))
        })?;
        let token_usage = family.extract_token_usage(&envelope);

        Ok(ModelResponse {
            raw_text,
            token_usage,
        })
    }
}
