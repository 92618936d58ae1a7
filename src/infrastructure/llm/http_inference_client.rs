use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::inference_endpoint::{InferenceEndpoint, InferenceError};

/// Bedrock-style HTTP gateway: one POST per invocation, model id in the
/// path, family-specific JSON envelope in the body.
pub struct HttpInferenceClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpInferenceClient {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(base_url: &str, api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl InferenceEndpoint for HttpInferenceClient {
    async fn invoke(&self, model_id: &str, body: Value) -> Result<Value, InferenceError> {
        let url = format!("{}/model/{}/invoke", self.base_url, model_id);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InferenceError::Timeout
                } else {
                    InferenceError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(InferenceError::Throttled);
        }
        if status.is_server_error() {
            let message = response.text().await.unwrap_or_default();
            return Err(InferenceError::ServiceError {
                status: status.as_u16(),
                message,
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(InferenceError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| InferenceError::Transport(format!("invalid JSON envelope: {e}")))
    }
}
