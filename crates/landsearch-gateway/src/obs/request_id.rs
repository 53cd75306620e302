//! Request correlation ids.
//!
//! Every request gets a fresh v4 UUID. It is echoed in `X-Request-ID`, stored
//! as a [`RequestId`] request extension, and scoped as a task local so error
//! bodies built anywhere underneath this layer can quote it.

use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

tokio::task_local! {
    static CURRENT: RequestId;
}

/// Id of the request the current task is serving, if any.
pub fn current() -> Option<String> {
    CURRENT.try_with(|id| id.0.clone()).ok()
}

pub async fn assign_request_id(mut req: Request, next: Next) -> Response {
    let id = RequestId(Uuid::new_v4().to_string());
    req.extensions_mut().insert(id.clone());
    let start = Instant::now();

    let mut resp = CURRENT.scope(id.clone(), next.run(req)).await;

    if let Ok(value) = HeaderValue::from_str(&id.0) {
        resp.headers_mut().insert(HeaderName::from_static(X_REQUEST_ID), value);
    }
    tracing::info!(
        request_id = %id.0,
        status = resp.status().as_u16(),
        duration_secs = start.elapsed().as_secs_f64(),
        "request completed"
    );

    resp
}
