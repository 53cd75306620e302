//! Shared error type across LandSearch crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request or config.
    BadRequest,
    /// Rate limited.
    RateLimited,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::RateLimited => "RATE_LIMITED",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, LandSearchError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum LandSearchError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid measurement: {0}")]
    InvalidMeasurement(String),
    #[error("rate limited")]
    RateLimited,
    #[error("internal: {0}")]
    Internal(String),
}

impl LandSearchError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            LandSearchError::InvalidConfiguration(_) | LandSearchError::InvalidMeasurement(_) => {
                ClientCode::BadRequest
            }
            LandSearchError::RateLimited => ClientCode::RateLimited,
            LandSearchError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Variant name, used as the `error_type` metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            LandSearchError::InvalidConfiguration(_) => "InvalidConfiguration",
            LandSearchError::InvalidMeasurement(_) => "InvalidMeasurement",
            LandSearchError::RateLimited => "RateLimited",
            LandSearchError::Internal(_) => "Internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_codes_are_stable() {
        let cases = [
            (LandSearchError::InvalidConfiguration("x".into()), "BAD_REQUEST", "InvalidConfiguration"),
            (LandSearchError::InvalidMeasurement("x".into()), "BAD_REQUEST", "InvalidMeasurement"),
            (LandSearchError::RateLimited, "RATE_LIMITED", "RateLimited"),
            (LandSearchError::Internal("x".into()), "INTERNAL", "Internal"),
        ];
        for (err, code, kind) in cases {
            assert_eq!(err.client_code().as_str(), code);
            assert_eq!(err.kind(), kind);
        }
    }
}
