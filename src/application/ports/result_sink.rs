use async_trait::async_trait;

use crate::domain::ExtractionResult;

/// Write-only recording of terminal results. Failures here never affect the
/// pipeline; the orchestrator logs and moves on.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn record(&self, result: &ExtractionResult) -> Result<(), ResultSinkError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ResultSinkError {
    #[error("failed to record result: {0}")]
    RecordFailed(String),
}
