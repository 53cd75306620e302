use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use landsearch_core::error::LandSearchError;

use crate::app_state::AppState;
use crate::error::ApiError;

/// Paths never throttled (health checks and scrapes).
pub const EXEMPT_PATHS: [&str; 2] = ["/health", "/metrics"];

/// Admit the request through the shared limiter, or answer 429.
pub async fn admit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if let Some(limiter) = state.limiter() {
        let path = req.uri().path();
        if !EXEMPT_PATHS.contains(&path) && !limiter.acquire() {
            tracing::warn!(method = %req.method(), path, "request rejected by rate limiter");
            return ApiError(LandSearchError::RateLimited).into_response();
        }
    }
    next.run(req).await
}
