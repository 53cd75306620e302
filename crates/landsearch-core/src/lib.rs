//! LandSearch core: error types and the token-bucket rate limiter.
//!
//! This crate carries no transport or runtime dependencies so the limiter can
//! be used by the HTTP gateway, background workers, or client tooling alike.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `LandSearchError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod ratelimit;

pub use error::{ClientCode, LandSearchError, Result};
pub use ratelimit::RateLimiter;
