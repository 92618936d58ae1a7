mod acquisition_router;
mod orchestrator;
mod prompt_builder;
mod response_parser;
mod retry;

pub use acquisition_router::{
    Acquired, AcquisitionFault, AcquisitionRouter, AcquisitionStrategy, select_strategy,
};
pub use orchestrator::{
    BatchOrchestrator, BatchOutcome, BatchRequest, ConfigurationError, OrchestratorConfig,
};
pub use prompt_builder::{PromptBuilder, SYSTEM_PROMPT, TRUNCATION_MARKER, VISION_INSTRUCTION};
pub use response_parser::{
    LIST_JOIN_SEPARATOR, ParseError, extract_json_span, normalize_object, parse_attributes,
};
pub use retry::RetryPolicy;
