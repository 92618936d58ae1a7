use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::BatchRequest;
use crate::domain::{
    AttributeSpec, DocumentRef, ExtractionResult, FewShotExample, ModelParams, ParsingMode,
};
use crate::presentation::state::AppState;

/// Batch submission boundary: an ordered list of documents plus one shared
/// extraction configuration.
#[derive(Deserialize)]
pub struct ExtractRequestBody {
    pub documents: Vec<String>,
    pub attributes: Vec<AttributeSpec>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub parsing_mode: ParsingMode,
    pub model_params: ModelParams,
    #[serde(default)]
    pub few_shots: Vec<FewShotExample>,
}

#[derive(Serialize)]
pub struct ExtractResponse {
    pub batch_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub submitted: usize,
    pub results: Vec<ExtractionResult>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(
    skip(state, body),
    fields(documents = body.documents.len(), model_id = %body.model_params.model_id)
)]
pub async fn extract_handler(
    State(state): State<AppState>,
    Json(body): Json<ExtractRequestBody>,
) -> impl IntoResponse {
    let batch = BatchRequest {
        documents: body.documents.into_iter().map(DocumentRef::new).collect(),
        parsing_mode: body.parsing_mode,
        attributes: body.attributes,
        instructions: body.instructions,
        model_params: body.model_params,
        few_shots: body.few_shots,
    };

    let submitted = batch.documents.len();
    match state.orchestrator.run_batch(batch).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(ExtractResponse {
                batch_id: outcome.batch_id,
                started_at: outcome.started_at,
                finished_at: outcome.finished_at,
                submitted,
                results: outcome.results,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Batch rejected: malformed configuration");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
