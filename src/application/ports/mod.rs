mod automation_pipeline;
mod llm_invoker;
mod ocr_engine;
mod office_extractor;
mod result_sink;

pub use automation_pipeline::{AutomationError, AutomationPipeline};
pub use llm_invoker::{LlmInvoker, LlmInvokerError};
pub use ocr_engine::{OcrEngine, OcrError, OcrOutput};
pub use office_extractor::{OfficeExtractError, OfficeExtractor};
pub use result_sink::{ResultSink, ResultSinkError};
