pub mod acquisition;
pub mod llm;
pub mod observability;
pub mod sink;
