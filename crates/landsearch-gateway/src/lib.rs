//! LandSearch gateway library entry.
//!
//! Wires config, request admission, request/operation metrics and the
//! operational endpoints into an axum service. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod error;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod router;
