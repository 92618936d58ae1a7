use async_trait::async_trait;
use serde_json::{Value, json};

use super::inference_endpoint::{InferenceEndpoint, InferenceError};

/// Returns a canned Anthropic-shaped envelope; handy for wiring the service
/// without a live gateway.
pub struct MockInferenceClient;

#[async_trait]
impl InferenceEndpoint for MockInferenceClient {
    async fn invoke(&self, _model_id: &str, _body: Value) -> Result<Value, InferenceError> {
        Ok(json!({
            "content": [{ "type": "text", "text": "{}" }],
            "usage": { "input_tokens": 0, "output_tokens": 0 },
        }))
    }
}
