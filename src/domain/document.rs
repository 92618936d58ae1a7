use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque locator for a document held by an external store. The pipeline
/// never dereferences it itself; collaborators do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentRef(String);

impl DocumentRef {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased file extension of the locator, if any.
    pub fn extension(&self) -> Option<String> {
        let name = self.0.rsplit('/').next().unwrap_or(&self.0);
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse document category driving acquisition strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    ImagePdf,
    Office,
    PlainText,
}

impl FileKind {
    const IMAGE_EXTENSIONS: [&'static str; 5] = ["pdf", "png", "jpg", "jpeg", "tif"];
    const OFFICE_EXTENSIONS: [&'static str; 6] = ["doc", "docx", "ppt", "pptx", "xls", "xlsx"];

    /// Classify a document by its locator extension. Anything unrecognized
    /// is treated as plain text and takes the OCR default path.
    pub fn from_document_ref(document_ref: &DocumentRef) -> Self {
        match document_ref.extension() {
            Some(ext) if Self::IMAGE_EXTENSIONS.contains(&ext.as_str()) => FileKind::ImagePdf,
            Some(ext) if Self::OFFICE_EXTENSIONS.contains(&ext.as_str()) => FileKind::Office,
            _ => FileKind::PlainText,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::ImagePdf => "image_pdf",
            FileKind::Office => "office",
            FileKind::PlainText => "plain_text",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the caller wants document content acquired before extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsingMode {
    #[default]
    OcrThenText,
    LlmVision,
    AutomationPipeline,
}

impl ParsingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParsingMode::OcrThenText => "ocr_then_text",
            ParsingMode::LlmVision => "llm_vision",
            ParsingMode::AutomationPipeline => "automation_pipeline",
        }
    }
}

impl FromStr for ParsingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ocr_then_text" => Ok(ParsingMode::OcrThenText),
            "llm_vision" => Ok(ParsingMode::LlmVision),
            "automation_pipeline" => Ok(ParsingMode::AutomationPipeline),
            _ => Err(format!("Invalid parsing mode: {}", s)),
        }
    }
}

impl fmt::Display for ParsingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
