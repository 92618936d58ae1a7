use std::sync::Arc;

use crate::application::services::BatchOrchestrator;
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<BatchOrchestrator>,
    pub settings: Settings,
}
