use async_trait::async_trait;

use crate::application::ports::{ResultSink, ResultSinkError};
use crate::domain::{ExtractionResult, ResultStatus};

/// Emits terminal results to the structured log stream. Stands in for the
/// external record store when none is wired.
pub struct LoggingResultSink;

#[async_trait]
impl ResultSink for LoggingResultSink {
    async fn record(&self, result: &ExtractionResult) -> Result<(), ResultSinkError> {
        match result.status {
            ResultStatus::Ok => tracing::info!(
                document_ref = %result.document_ref,
                "Extraction completed"
            ),
            ResultStatus::Failed => {
                let (kind, message) = result
                    .error
                    .as_ref()
                    .map(|e| (e.kind.as_str(), e.message.as_str()))
                    .unwrap_or(("unknown", ""));
                tracing::warn!(
                    document_ref = %result.document_ref,
                    error_kind = kind,
                    error = message,
                    "Extraction failed"
                );
            }
        }
        Ok(())
    }
}
