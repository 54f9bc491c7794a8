//! Extraction routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use super::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/extract-assignments", post(extract_assignments))
        .route("/tag", post(tag_text))
}

/// Pasted listing text.
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

/// POST /api/extract-assignments: records for every item in the text.
async fn extract_assignments(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExtractRequest>,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("extract", %request_id);

    async move {
        info!("Extracting from {} bytes of text", req.text.len());
        match state.extractor.extract(&req.text).await {
            Ok(outcome) => (
                StatusCode::OK,
                Json(json!({ "assignments": outcome.records })),
            )
                .into_response(),
            Err(e) => {
                error!("Extraction failed: {}", e);
                error_response(&e).into_response()
            }
        }
    }
    .instrument(span)
    .await
}

/// POST /api/tag: tagged and cleaned text, no model call.
async fn tag_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExtractRequest>,
) -> Response {
    match state.extractor.preview(&req.text).await {
        Ok(preview) => (StatusCode::OK, Json(preview)).into_response(),
        Err(e) => {
            error!("Tagging failed: {}", e);
            error_response(&e).into_response()
        }
    }
}
