use async_trait::async_trait;

use crate::domain::DocumentRef;

#[derive(Debug, Clone, PartialEq)]
pub struct OcrOutput {
    pub text: String,
    pub page_count: u32,
}

#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn extract_text(&self, document_ref: &DocumentRef) -> Result<OcrOutput, OcrError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("ocr service throttled the request")]
    Throttled,
    #[error("ocr service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("malformed document: {0}")]
    MalformedDocument(String),
}

impl OcrError {
    pub fn is_transient(&self) -> bool {
        matches!(self, OcrError::Throttled | OcrError::ServiceUnavailable(_))
    }
}
