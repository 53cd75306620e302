//! Lightweight in-process metrics.
//!
//! Counters and histograms are atomics inside `DashMap` shards, rendered by the
//! `/metrics` handler in the Prometheus text format. Registries are built
//! explicitly and passed around; nothing here is a process global.

pub mod http;
pub mod manager;
pub mod metrics;
pub mod monitor;
pub mod request_id;

pub use manager::MetricsManager;
pub use metrics::MetricsRegistry;
pub use monitor::{MonitoredFn, OperationMetrics, OperationSpan};
pub use request_id::RequestId;
