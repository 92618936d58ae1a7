mod extract;
mod health;
mod models;

pub use extract::{ExtractRequestBody, ExtractResponse, extract_handler};
pub use health::health_handler;
pub use models::models_handler;
