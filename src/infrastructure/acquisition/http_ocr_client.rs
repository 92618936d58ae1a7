use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{OcrEngine, OcrError, OcrOutput};
use crate::domain::DocumentRef;

/// OCR collaborator over HTTP. The service dereferences the document
/// locator itself; the pipeline only ships the ref.
pub struct HttpOcrClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpOcrClient {
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

#[derive(Deserialize)]
struct OcrResponse {
    text: String,
    page_count: u32,
}

#[async_trait]
impl OcrEngine for HttpOcrClient {
    async fn extract_text(&self, document_ref: &DocumentRef) -> Result<OcrOutput, OcrError> {
        let url = format!("{}/extract", self.base_url);
        let body = json!({ "document_ref": document_ref.as_str() });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| OcrError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(OcrError::Throttled);
        }
        if status.is_server_error() {
            let message = response.text().await.unwrap_or_default();
            return Err(OcrError::ServiceUnavailable(format!("{status}: {message}")));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OcrError::MalformedDocument(format!("{status}: {message}")));
        }

        let parsed: OcrResponse = response
            .json()
            .await
            .map_err(|e| OcrError::ServiceUnavailable(format!("invalid OCR response: {e}")))?;

        Ok(OcrOutput {
            text: parsed.text,
            page_count: parsed.page_count,
        })
    }
}
