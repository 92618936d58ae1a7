use async_trait::async_trait;

use crate::domain::DocumentRef;

#[async_trait]
pub trait OfficeExtractor: Send + Sync {
    async fn extract_text(
        &self,
        document_ref: &DocumentRef,
        extension: &str,
    ) -> Result<String, OfficeExtractError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OfficeExtractError {
    #[error("unsupported office extension: {0}")]
    UnsupportedExtension(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("office extractor unavailable: {0}")]
    ServiceUnavailable(String),
}

impl OfficeExtractError {
    pub fn is_transient(&self) -> bool {
        matches!(self, OfficeExtractError::ServiceUnavailable(_))
    }
}
