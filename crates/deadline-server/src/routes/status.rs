//! Service status route.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/status", get(get_status))
}

/// GET /api/status: collaborator availability.
async fn get_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let active = state.extractor.generator().active_model();

    Json(serde_json::json!({
        "recognizerAvailable": state.extractor.tagger().recognizer_available(),
        "llmAvailable": active.is_some(),
        "llmProvider": active.as_ref().map(|a| a.provider.to_string()),
        "model": active.as_ref().map(|a| a.model.clone()),
        "allDayCopies": state.config.all_day_copies,
    }))
}
