mod bedrock_invoker;
mod http_inference_client;
mod inference_endpoint;
mod mock_inference_client;
mod model_family;

pub use bedrock_invoker::BedrockInvoker;
pub use http_inference_client::HttpInferenceClient;
pub use inference_endpoint::{InferenceEndpoint, InferenceError};
pub use mock_inference_client::MockInferenceClient;
pub use model_family::{ModelFamily, strip_region_prefix};
