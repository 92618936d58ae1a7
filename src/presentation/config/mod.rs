mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AcquisitionSettings, InferenceSettings, PipelineSettings, ServerSettings, Settings,
};
