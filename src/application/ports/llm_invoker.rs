use async_trait::async_trait;

use crate::domain::{ExtractionPrompt, ModelParams, ModelResponse};

/// Normalizes a prompt into the request shape of the selected model family,
/// invokes the inference endpoint, and normalizes the family-specific
/// response envelope back into raw text.
#[async_trait]
pub trait LlmInvoker: Send + Sync {
    async fn invoke(
        &self,
        prompt: &ExtractionPrompt,
        params: &ModelParams,
    ) -> Result<ModelResponse, LlmInvokerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmInvokerError {
    #[error("unsupported model id: {0}")]
    UnsupportedModel(String),
    #[error("inference endpoint throttled the request")]
    Throttled,
    #[error("inference request timed out")]
    Timeout,
    #[error("inference endpoint error: {0}")]
    ServiceError(String),
    #[error("transport fault: {0}")]
    Transport(String),
    #[error("inference endpoint rejected the request: {0}")]
    Rejected(String),
    #[error("invalid response envelope: {0}")]
    InvalidResponse(String),
}

impl LlmInvokerError {
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LlmInvokerError::Throttled
                | LlmInvokerError::Timeout
                | LlmInvokerError::ServiceError(_)
                | LlmInvokerError::Transport(_)
        )
    }
}
