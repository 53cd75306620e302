//! Top-level facade crate for LandSearch.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use landsearch_core::*;
}

pub mod gateway {
    pub use landsearch_gateway::*;
}

pub use landsearch_core::{LandSearchError, RateLimiter, Result};
pub use landsearch_gateway::obs::{MetricsManager, MetricsRegistry, OperationMetrics};
