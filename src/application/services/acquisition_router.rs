use std::sync::Arc;

use serde_json::Value;

use crate::application::ports::{
    AutomationError, AutomationPipeline, OcrEngine, OcrError, OfficeExtractError, OfficeExtractor,
};
use crate::domain::{AcquiredContent, ExtractionRequest, FileKind, ParsingMode};

/// The four acquisition paths. Selection is deterministic and picks exactly
/// one strategy per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionStrategy {
    VisionImages,
    Automation,
    OfficeText,
    OcrText,
}

/// Strategy precedence, checked in order: the vision-mode condition first,
/// then the automation mode (which beats an office extension), then office
/// files, then the OCR default. This ordering determines per-document cost
/// and latency and must not be reordered.
pub fn select_strategy(file_kind: FileKind, parsing_mode: ParsingMode) -> AcquisitionStrategy {
    if file_kind == FileKind::ImagePdf && parsing_mode == ParsingMode::LlmVision {
        return AcquisitionStrategy::VisionImages;
    }
    if parsing_mode == ParsingMode::AutomationPipeline {
        return AcquisitionStrategy::Automation;
    }
    if file_kind == FileKind::Office {
        return AcquisitionStrategy::OfficeText;
    }
    AcquisitionStrategy::OcrText
}

/// Outcome of the acquisition stage. `Extracted` is the automation path:
/// the attribute map is already complete and the pipeline terminates early.
#[derive(Debug, Clone, PartialEq)]
pub enum Acquired {
    Content(AcquiredContent),
    Extracted(serde_json::Map<String, Value>),
}

pub struct AcquisitionRouter {
    ocr: Arc<dyn OcrEngine>,
    office: Arc<dyn OfficeExtractor>,
    automation: Arc<dyn AutomationPipeline>,
}

impl AcquisitionRouter {
    pub fn new(
        ocr: Arc<dyn OcrEngine>,
        office: Arc<dyn OfficeExtractor>,
        automation: Arc<dyn AutomationPipeline>,
    ) -> Self {
        Self {
            ocr,
            office,
            automation,
        }
    }

    pub async fn acquire(&self, request: &ExtractionRequest) -> Result<Acquired, AcquisitionFault> {
        let strategy = select_strategy(request.file_kind, request.parsing_mode);
        tracing::debug!(
            document_ref = %request.document_ref,
            file_kind = %request.file_kind,
            parsing_mode = %request.parsing_mode,
            strategy = ?strategy,
            "Acquisition strategy selected"
        );

        match strategy {
            AcquisitionStrategy::VisionImages => Ok(Acquired::Content(AcquiredContent::Images {
                refs: vec![request.document_ref.as_str().to_string()],
            })),
            AcquisitionStrategy::Automation => {
                let attributes = self
                    .automation
                    .run(&request.document_ref, &request.attributes)
                    .await?;
                Ok(Acquired::Extracted(attributes))
            }
            AcquisitionStrategy::OfficeText => {
                let extension = request.document_ref.extension().unwrap_or_default();
                let body = self
                    .office
                    .extract_text(&request.document_ref, &extension)
                    .await?;
                Ok(Acquired::Content(AcquiredContent::Text { body }))
            }
            AcquisitionStrategy::OcrText => {
                let output = self.ocr.extract_text(&request.document_ref).await?;
                tracing::debug!(
                    document_ref = %request.document_ref,
                    page_count = output.page_count,
                    "OCR extraction complete"
                );
                Ok(Acquired::Content(AcquiredContent::Text { body: output.text }))
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AcquisitionFault {
    #[error("ocr: {0}")]
    Ocr(#[from] OcrError),
    #[error("office extraction: {0}")]
    Office(#[from] OfficeExtractError),
    #[error("automation: {0}")]
    Automation(#[from] AutomationError),
}

impl AcquisitionFault {
    pub fn is_transient(&self) -> bool {
        match self {
            AcquisitionFault::Ocr(e) => e.is_transient(),
            AcquisitionFault::Office(e) => e.is_transient(),
            AcquisitionFault::Automation(e) => e.is_transient(),
        }
    }
}
