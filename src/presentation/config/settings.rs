use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::application::services::{OrchestratorConfig, RetryPolicy};
use crate::presentation::config::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerSettings,
    pub inference: InferenceSettings,
    pub acquisition: AcquisitionSettings,
    pub pipeline: PipelineSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferenceSettings {
    /// Bedrock-style gateway base URL; the mock endpoint is wired when unset.
    pub endpoint_url: Option<String>,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AcquisitionSettings {
    pub ocr_url: Option<String>,
    pub ocr_api_key: String,
    pub office_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    pub max_concurrency: usize,
    pub max_attributes: usize,
    pub max_input_chars: usize,
    pub document_timeout_secs: u64,
    pub batch_deadline_secs: u64,
    pub retry_max_attempts: u32,
    pub retry_initial_delay_ms: u64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_concurrency: 16,
            max_attributes: 50,
            max_input_chars: 48_000,
            document_timeout_secs: 300,
            batch_deadline_secs: 900,
            retry_max_attempts: 3,
            retry_initial_delay_ms: 1_000,
        }
    }
}

impl PipelineSettings {
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            max_concurrency: self.max_concurrency,
            max_attributes: self.max_attributes,
            document_timeout: Duration::from_secs(self.document_timeout_secs),
            batch_deadline: Duration::from_secs(self.batch_deadline_secs),
            retry: RetryPolicy {
                max_attempts: self.retry_max_attempts,
                initial_delay: Duration::from_millis(self.retry_initial_delay_ms),
            },
        }
    }
}

impl Settings {
    /// Assemble settings from environment variables with sensible defaults,
    /// suitable for local runs and containers alike.
    pub fn from_env() -> Self {
        let defaults = PipelineSettings::default();
        Self {
            environment: std::env::var("APP_ENV")
                .ok()
                .and_then(|v| Environment::try_from(v).ok())
                .unwrap_or(Environment::Local),
            server: ServerSettings {
                host: env_or("SERVER_HOST", "0.0.0.0".to_string()),
                port: env_or("SERVER_PORT", 3000),
            },
            inference: InferenceSettings {
                endpoint_url: std::env::var("INFERENCE_ENDPOINT_URL").ok(),
                api_key: env_or("INFERENCE_API_KEY", String::new()),
            },
            acquisition: AcquisitionSettings {
                ocr_url: std::env::var("OCR_ENDPOINT_URL").ok(),
                ocr_api_key: env_or("OCR_API_KEY", String::new()),
                office_url: std::env::var("OFFICE_ENDPOINT_URL").ok(),
            },
            pipeline: PipelineSettings {
                max_concurrency: env_or("PIPELINE_MAX_CONCURRENCY", defaults.max_concurrency),
                max_attributes: env_or("PIPELINE_MAX_ATTRIBUTES", defaults.max_attributes),
                max_input_chars: env_or("PIPELINE_MAX_INPUT_CHARS", defaults.max_input_chars),
                document_timeout_secs: env_or(
                    "PIPELINE_DOCUMENT_TIMEOUT_SECS",
                    defaults.document_timeout_secs,
                ),
                batch_deadline_secs: env_or(
                    "PIPELINE_BATCH_DEADLINE_SECS",
                    defaults.batch_deadline_secs,
                ),
                retry_max_attempts: env_or("PIPELINE_RETRY_MAX_ATTEMPTS", defaults.retry_max_attempts),
                retry_initial_delay_ms: env_or(
                    "PIPELINE_RETRY_INITIAL_DELAY_MS",
                    defaults.retry_initial_delay_ms,
                ),
            },
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
