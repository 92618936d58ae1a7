use async_trait::async_trait;
use serde_json::Value;

/// Transport to the model-serving layer: takes a family-specific request
/// envelope, returns the family-specific response envelope.
#[async_trait]
pub trait InferenceEndpoint: Send + Sync {
    async fn invoke(&self, model_id: &str, body: Value) -> Result<Value, InferenceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("inference endpoint throttled the request")]
    Throttled,
    #[error("inference request timed out")]
    Timeout,
    #[error("inference endpoint returned {status}: {message}")]
    ServiceError { status: u16, message: String },
    #[error("inference endpoint rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("transport fault: {0}")]
    Transport(String),
}
