use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{AttributeSpec, DocumentRef};

/// Managed extraction collaborator. When selected it returns a finished
/// attribute map and the rest of the pipeline is skipped.
#[async_trait]
pub trait AutomationPipeline: Send + Sync {
    async fn run(
        &self,
        document_ref: &DocumentRef,
        attributes: &[AttributeSpec],
    ) -> Result<serde_json::Map<String, Value>, AutomationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AutomationError {
    #[error("automation pipeline throttled the request")]
    Throttled,
    #[error("automation pipeline unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("automation pipeline rejected the document: {0}")]
    RejectedDocument(String),
}

impl AutomationError {
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AutomationError::Throttled | AutomationError::ServiceUnavailable(_)
        )
    }
}
