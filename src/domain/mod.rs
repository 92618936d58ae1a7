mod attribute;
mod document;
mod extraction;

pub use attribute::{AttributeSpec, AttributeType, FewShotExample};
pub use document::{DocumentRef, FileKind, ParsingMode};
pub use extraction::{
    AcquiredContent, DocumentStage, ErrorKind, ExtractionError, ExtractionPrompt,
    ExtractionRequest, ExtractionResult, ModelParams, ModelResponse, ResultStatus, TokenUsage,
};
