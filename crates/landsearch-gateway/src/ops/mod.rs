//! Operational HTTP endpoints.
//!
//! - `/health`  : liveness + version
//! - `/metrics` : Prometheus text format
//! - fallback   : JSON 404

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::app_state::AppState;
use crate::error::error_envelope;

pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": state.cfg().server.api_version,
    }))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().metrics_snapshot();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        body,
    )
        .into_response()
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, error_envelope("NOT_FOUND", "no such route"))
}
