//! HTTP route handlers.

pub mod extract;
pub mod llm_config;
pub mod status;

use std::sync::Arc;

use axum::http::{HeaderValue, StatusCode};
use axum::{Json, Router};
use deadline_core::Error;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    Router::new()
        .nest("/api", api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(extract::routes())
        .merge(status::routes())
        .merge(llm_config::routes())
}

/// Allow-list when origins are configured, permissive otherwise.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Status code for a failed request.
pub fn error_status(err: &Error) -> StatusCode {
    match err {
        Error::Recognizer(_) | Error::Generation(_) => StatusCode::BAD_GATEWAY,
        Error::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        Error::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
        Error::Invariant(_) | Error::Internal(_) | Error::Io(_) | Error::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub(crate) fn error_response(err: &Error) -> (StatusCode, Json<Value>) {
    (error_status(err), Json(json!({ "error": err.to_string() })))
}
