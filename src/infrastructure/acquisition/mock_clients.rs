use async_trait::async_trait;
use serde_json::Value;

use crate::application::ports::{
    AutomationError, AutomationPipeline, OcrEngine, OcrError, OcrOutput, OfficeExtractError,
    OfficeExtractor,
};
use crate::domain::{AttributeSpec, DocumentRef};

pub struct MockOcrClient;

#[async_trait]
impl OcrEngine for MockOcrClient {
    async fn extract_text(&self, document_ref: &DocumentRef) -> Result<OcrOutput, OcrError> {
        Ok(OcrOutput {
            text: format!("Mock OCR text for {}", document_ref),
            page_count: 1,
        })
    }
}

pub struct MockOfficeExtractor;

#[async_trait]
impl OfficeExtractor for MockOfficeExtractor {
    async fn extract_text(
        &self,
        document_ref: &DocumentRef,
        _extension: &str,
    ) -> Result<String, OfficeExtractError> {
        Ok(format!("Mock office text for {}", document_ref))
    }
}

pub struct MockAutomationClient;

#[async_trait]
impl AutomationPipeline for MockAutomationClient {
    async fn run(
        &self,
        _document_ref: &DocumentRef,
        attributes: &[AttributeSpec],
    ) -> Result<serde_json::Map<String, Value>, AutomationError> {
        Ok(attributes
            .iter()
            .map(|attribute| (attribute.name.clone(), Value::Null))
            .collect())
    }
}
