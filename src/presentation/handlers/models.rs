use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::infrastructure::llm::ModelFamily;

#[derive(Serialize)]
pub struct ModelFamilyInfo {
    pub family: &'static str,
    pub id_prefix: &'static str,
    pub vision: bool,
}

#[derive(Serialize)]
pub struct ModelsResponse {
    pub families: Vec<ModelFamilyInfo>,
}

/// Supported model families and the id prefixes that route to them.
pub async fn models_handler() -> impl IntoResponse {
    let families = ModelFamily::ALL
        .iter()
        .map(|family| ModelFamilyInfo {
            family: family.as_str(),
            id_prefix: family.id_prefix(),
            vision: family.supports_vision(),
        })
        .collect();

    (StatusCode::OK, Json(ModelsResponse { families }))
}
