use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use tabulate::application::ports::{
    AutomationError, AutomationPipeline, LlmInvoker, LlmInvokerError, OcrEngine, OcrError,
    OcrOutput, OfficeExtractError, OfficeExtractor,
};
use tabulate::application::services::{AcquisitionRouter, BatchOrchestrator, PromptBuilder};
use tabulate::domain::{AttributeSpec, DocumentRef, ExtractionPrompt, ModelParams, ModelResponse};
use tabulate::infrastructure::sink::MemoryResultSink;
use tabulate::presentation::{AppState, create_router};

struct MockOcr;

#[async_trait::async_trait]
impl OcrEngine for MockOcr {
    async fn extract_text(&self, document_ref: &DocumentRef) -> Result<OcrOutput, OcrError> {
        Ok(OcrOutput {
            text: format!("document body of {}", document_ref),
            page_count: 1,
        })
    }
}

struct MockOffice;

#[async_trait::async_trait]
impl OfficeExtractor for MockOffice {
    async fn extract_text(
        &self,
        document_ref: &DocumentRef,
        _extension: &str,
    ) -> Result<String, OfficeExtractError> {
        Ok(format!("office body of {}", document_ref))
    }
}

struct MockAutomation;

#[async_trait::async_trait]
impl AutomationPipeline for MockAutomation {
    async fn run(
        &self,
        _document_ref: &DocumentRef,
        attributes: &[AttributeSpec],
    ) -> Result<serde_json::Map<String, Value>, AutomationError> {
        Ok(attributes
            .iter()
            .map(|a| (a.name.clone(), Value::Null))
            .collect())
    }
}

struct MockInvoker;

#[async_trait::async_trait]
impl LlmInvoker for MockInvoker {
    async fn invoke(
        &self,
        _prompt: &ExtractionPrompt,
        _params: &ModelParams,
    ) -> Result<ModelResponse, LlmInvokerError> {
        Ok(ModelResponse {
            raw_text: r#"{"total": 125.0, "tags": ["finance"]}"#.to_string(),
            token_usage: None,
        })
    }
}

fn create_test_app() -> axum::Router {
    use tabulate::presentation::config::Settings;

    let orchestrator = Arc::new(BatchOrchestrator::new(
        AcquisitionRouter::new(Arc::new(MockOcr), Arc::new(MockOffice), Arc::new(MockAutomation)),
        PromptBuilder::new(48_000),
        Arc::new(MockInvoker),
        Arc::new(MemoryResultSink::new()),
        Default::default(),
    ));

    let state = AppState {
        orchestrator,
        settings: Settings::from_env(),
    };

    create_router(state)
}

fn extract_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/extract")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn given_running_server_when_health_check_then_returns_ok() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn given_valid_batch_when_posting_extract_then_one_result_per_document_is_returned() {
    let app = create_test_app();

    let response = app
        .oneshot(extract_request(json!({
            "documents": ["invoice.pdf", "notes.txt"],
            "attributes": [
                { "name": "total", "description": "invoice total" },
                { "name": "tags", "description": "document tags", "value_type": "list" },
            ],
            "model_params": { "model_id": "anthropic.claude-3-5-sonnet-20240620-v1:0" },
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["submitted"], json!(2));
    assert!(json["batch_id"].is_string());
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    for result in results {
        assert_eq!(result["status"], json!("ok"));
        assert_eq!(result["attributes"]["total"], json!(125.0));
        assert_eq!(result["attributes"]["tags"], json!(["finance"]));
    }
}

#[tokio::test]
async fn given_empty_attribute_set_when_posting_extract_then_returns_bad_request() {
    let app = create_test_app();

    let response = app
        .oneshot(extract_request(json!({
            "documents": ["invoice.pdf"],
            "attributes": [],
            "model_params": { "model_id": "anthropic.claude-3-5-sonnet-20240620-v1:0" },
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn given_malformed_json_when_posting_extract_then_returns_client_error() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/extract")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn given_running_server_when_listing_models_then_families_are_described() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/models")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    let families = json["families"].as_array().unwrap();
    assert_eq!(families.len(), 7);
    let anthropic = families
        .iter()
        .find(|f| f["family"] == json!("anthropic"))
        .unwrap();
    assert_eq!(anthropic["vision"], json!(true));
}

#[tokio::test]
async fn given_any_request_when_handled_then_a_request_id_header_is_attached() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}
