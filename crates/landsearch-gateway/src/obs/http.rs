//! Request metrics middleware.
//!
//! Every request is counted in `app_http_requests_total` and timed in
//! `app_http_request_duration_seconds`, including requests rejected by layers
//! underneath (admission, handler errors). Responses built from an `ApiError`
//! also bump `app_error_total{error_type}`.
//!
//! `endpoint` is the matched route template, so `/parcels/:id` is one series
//! however many ids are requested. Requests that match no route share the
//! `unmatched` series.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;
use crate::error::ErrorType;

/// `endpoint` label for requests that reached the fallback.
pub const UNMATCHED: &str = "unmatched";

pub async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().as_str().to_owned();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED.to_owned());
    let start = Instant::now();

    let resp = next.run(req).await;

    let metrics = state.metrics();
    metrics.increment_request_count(&method, &endpoint, resp.status().as_str());
    metrics.observe_request_duration(&method, &endpoint, start.elapsed());

    if let Some(&ErrorType(kind)) = resp.extensions().get::<ErrorType>() {
        metrics.increment_error_count(kind);
        tracing::debug!(%method, %endpoint, status = resp.status().as_u16(), error_type = kind, "request failed");
    }

    resp
}
