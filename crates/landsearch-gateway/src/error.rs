//! HTTP mapping for `LandSearchError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use landsearch_core::error::{ClientCode, LandSearchError};

use crate::obs::request_id;

/// Marker placed in response extensions so the request metrics layer can
/// count the failure under its error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorType(pub &'static str);

/// Handler-facing error wrapper.
#[derive(Debug)]
pub struct ApiError(pub LandSearchError);

impl From<LandSearchError> for ApiError {
    fn from(e: LandSearchError) -> Self {
        Self(e)
    }
}

fn status_for(code: ClientCode) -> StatusCode {
    match code {
        ClientCode::BadRequest => StatusCode::BAD_REQUEST,
        ClientCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// JSON error body shared by every non-2xx response the service builds.
///
/// `request_id` is the id assigned by the request id layer, or `null` when
/// the body is built outside a request.
pub fn error_envelope(code: &str, message: &str) -> Json<Value> {
    Json(json!({
        "error": {
            "code": code,
            "message": message,
            "details": null,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "request_id": request_id::current(),
        }
    }))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let body = error_envelope(code.as_str(), &self.0.to_string());

        let mut resp = (status_for(code), body).into_response();
        resp.extensions_mut().insert(ErrorType(self.0.kind()));
        resp
    }
}
