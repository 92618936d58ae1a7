use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use tabulate::application::ports::{AutomationPipeline, LlmInvoker, OcrEngine, OfficeExtractor};
use tabulate::application::services::{AcquisitionRouter, BatchOrchestrator, PromptBuilder};
use tabulate::infrastructure::acquisition::{
    HttpOcrClient, HttpOfficeExtractor, MockAutomationClient, MockOcrClient, MockOfficeExtractor,
};
use tabulate::infrastructure::llm::{
    BedrockInvoker, HttpInferenceClient, InferenceEndpoint, MockInferenceClient,
};
use tabulate::infrastructure::observability::{TracingConfig, init_tracing};
use tabulate::infrastructure::sink::LoggingResultSink;
use tabulate::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();

    let tracing_config = TracingConfig {
        environment: settings.environment.to_string(),
        json_format: std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(settings.environment == Environment::Prod),
    };
    init_tracing(tracing_config, settings.server.port);

    let ocr: Arc<dyn OcrEngine> = match settings.acquisition.ocr_url.as_deref() {
        Some(url) => Arc::new(HttpOcrClient::new(url, &settings.acquisition.ocr_api_key)),
        None => {
            tracing::warn!("OCR_ENDPOINT_URL not set, using mock OCR client");
            Arc::new(MockOcrClient)
        }
    };
    let office: Arc<dyn OfficeExtractor> = match settings.acquisition.office_url.as_deref() {
        Some(url) => Arc::new(HttpOfficeExtractor::new(url)),
        None => {
            tracing::warn!("OFFICE_ENDPOINT_URL not set, using mock office extractor");
            Arc::new(MockOfficeExtractor)
        }
    };
    let automation: Arc<dyn AutomationPipeline> = Arc::new(MockAutomationClient);

    let endpoint: Arc<dyn InferenceEndpoint> = match settings.inference.endpoint_url.as_deref() {
        Some(url) => Arc::new(HttpInferenceClient::new(url, &settings.inference.api_key)),
        None => {
            tracing::warn!("INFERENCE_ENDPOINT_URL not set, using mock inference endpoint");
            Arc::new(MockInferenceClient)
        }
    };
    let invoker: Arc<dyn LlmInvoker> = Arc::new(BedrockInvoker::new(endpoint));

    let orchestrator = Arc::new(BatchOrchestrator::new(
        AcquisitionRouter::new(ocr, office, automation),
        PromptBuilder::new(settings.pipeline.max_input_chars),
        invoker,
        Arc::new(LoggingResultSink),
        settings.pipeline.orchestrator_config(),
    ));

    let state = AppState {
        orchestrator,
        settings: settings.clone(),
    };
    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
