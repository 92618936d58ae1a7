use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AttributeSpec, DocumentRef, FewShotExample, FileKind, ParsingMode};

/// Generation parameters forwarded to the model family adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub model_id: String,
    #[serde(default = "ModelParams::default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "ModelParams::default_top_p")]
    pub top_p: f32,
}

impl ModelParams {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            max_output_tokens: Self::default_max_output_tokens(),
            temperature: 0.0,
            top_p: Self::default_top_p(),
        }
    }

    fn default_max_output_tokens() -> u32 {
        4096
    }

    fn default_top_p() -> f32 {
        1.0
    }
}

/// Everything the pipeline needs to process one document. Created once when
/// a batch is submitted and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub document_ref: DocumentRef,
    pub file_kind: FileKind,
    pub parsing_mode: ParsingMode,
    pub attributes: Vec<AttributeSpec>,
    pub instructions: Option<String>,
    pub model_params: ModelParams,
    pub few_shots: Vec<FewShotExample>,
}

/// Output of the acquisition stage: either plain text, or the document's
/// pages handed to the model as image locators.
#[derive(Debug, Clone, PartialEq)]
pub enum AcquiredContent {
    Text { body: String },
    Images { refs: Vec<String> },
}

/// Fully assembled prompt ready for the model invocation adapter. For the
/// vision path `images` carries the ordered page locators.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionPrompt {
    pub system: String,
    pub user: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TokenUsage {
    pub input: u64,
    pub output: u64,
}

/// Raw model output, discarded once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResponse {
    pub raw_text: String,
    pub token_usage: Option<TokenUsage>,
}

/// Per-document pipeline state. Terminal states are `Completed` and
/// `Failed`; a document never leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStage {
    Pending,
    Acquiring,
    Prompting,
    Invoking,
    Parsing,
    Completed,
    Failed,
}

impl DocumentStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStage::Pending => "pending",
            DocumentStage::Acquiring => "acquiring",
            DocumentStage::Prompting => "prompting",
            DocumentStage::Invoking => "invoking",
            DocumentStage::Parsing => "parsing",
            DocumentStage::Completed => "completed",
            DocumentStage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentStage::Completed | DocumentStage::Failed)
    }
}

impl fmt::Display for DocumentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Wire-visible failure classification for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    AcquisitionError,
    InvocationError,
    ParseError,
    UnsupportedModel,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::AcquisitionError => "acquisition_error",
            ErrorKind::InvocationError => "invocation_error",
            ErrorKind::ParseError => "parse_error",
            ErrorKind::UnsupportedModel => "unsupported_model",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic payload for a failed document. For parse failures the raw
/// model text is preserved so callers can adjust attribute descriptions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Ok,
    Failed,
}

/// Terminal, externally visible artifact of one document's pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub document_ref: DocumentRef,
    pub status: ResultStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ExtractionError>,
}

impl ExtractionResult {
    pub fn completed(
        document_ref: DocumentRef,
        attributes: serde_json::Map<String, Value>,
    ) -> Self {
        Self {
            document_ref,
            status: ResultStatus::Ok,
            attributes: Some(attributes),
            error: None,
        }
    }

    pub fn failed(
        document_ref: DocumentRef,
        kind: ErrorKind,
        message: impl Into<String>,
        raw_text: Option<String>,
    ) -> Self {
        Self {
            document_ref,
            status: ResultStatus::Failed,
            attributes: None,
            error: Some(ExtractionError {
                kind,
                message: message.into(),
                raw_text,
            }),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ResultStatus::Ok
    }
}
