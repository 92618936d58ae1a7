mod logging_result_sink;
mod memory_result_sink;

pub use logging_result_sink::LoggingResultSink;
pub use memory_result_sink::MemoryResultSink;
