use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{OfficeExtractError, OfficeExtractor};
use crate::domain::DocumentRef;

/// Office-document text extraction collaborator over HTTP.
pub struct HttpOfficeExtractor {
    client: Client,
    base_url: String,
}

impl HttpOfficeExtractor {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Deserialize)]
struct OfficeResponse {
    text: String,
}

#[async_trait]
impl OfficeExtractor for HttpOfficeExtractor {
    async fn extract_text(
        &self,
        document_ref: &DocumentRef,
        extension: &str,
    ) -> Result<String, OfficeExtractError> {
        let url = format!("{}/extract", self.base_url);
        let body = json!({
            "document_ref": document_ref.as_str(),
            "extension": extension,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| OfficeExtractError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            let message = response.text().await.unwrap_or_default();
            return Err(OfficeExtractError::ServiceUnavailable(format!(
                "{status}: {message}"
            )));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OfficeExtractError::ExtractionFailed(format!(
                "{status}: {message}"
            )));
        }

        let parsed: OfficeResponse = response.json().await.map_err(|e| {
            OfficeExtractError::ServiceUnavailable(format!("invalid extractor response: {e}"))
        })?;

        Ok(parsed.text)
    }
}
