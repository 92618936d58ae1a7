use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{ResultSink, ResultSinkError};
use crate::domain::{DocumentRef, ExtractionResult};

/// In-memory sink keyed by document ref. Later results for the same ref
/// overwrite earlier ones.
#[derive(Default)]
pub struct MemoryResultSink {
    records: Mutex<HashMap<DocumentRef, ExtractionResult>>,
}

impl MemoryResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, document_ref: &DocumentRef) -> Option<ExtractionResult> {
        self.records
            .lock()
            .expect("result sink mutex poisoned")
            .get(document_ref)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("result sink mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResultSink for MemoryResultSink {
    async fn record(&self, result: &ExtractionResult) -> Result<(), ResultSinkError> {
        self.records
            .lock()
            .map_err(|e| ResultSinkError::RecordFailed(e.to_string()))?
            .insert(result.document_ref.clone(), result.clone());
        Ok(())
    }
}
