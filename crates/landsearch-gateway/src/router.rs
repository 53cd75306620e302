//! Axum router wiring.
//!
//! Layer order (outermost first): request id, request metrics, admission,
//! handlers. A request rejected by the limiter is still counted, timed and
//! tagged with an id.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, obs, ops, policy};

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new().route("/health", get(ops::health));
    if state.cfg().metrics.enabled {
        router = router.route("/metrics", get(ops::metrics));
    }

    router
        .fallback(ops::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), policy::admit))
        .layer(middleware::from_fn_with_state(state.clone(), obs::http::track_requests))
        .layer(middleware::from_fn(obs::request_id::assign_request_id))
        .with_state(state)
}
