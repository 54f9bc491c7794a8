//! LLM configuration routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use deadline_chat::LLMConfigUpdate;

use super::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/chat/config", get(get_config).put(update_config))
}

/// GET /api/chat/config: current config, keys masked.
async fn get_config(State(state): State<Arc<AppState>>) -> Response {
    let config = state.llm_config.read();
    Json(config.to_response()).into_response()
}

/// PUT /api/chat/config: merge an update and persist it.
async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<LLMConfigUpdate>,
) -> Response {
    let mut config = state.llm_config.write();
    config.apply_update(&update);

    if let Err(e) = config.save() {
        return error_response(&e).into_response();
    }

    (StatusCode::OK, Json(config.to_response())).into_response()
}
