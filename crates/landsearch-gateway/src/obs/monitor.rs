//! Operation monitoring: success/failure counts and latency for any fallible
//! unit of work (vector-store calls, extraction jobs, ...).
//!
//! One `OperationMetrics` is built at startup and shared (`Arc`) by every call
//! site. Each monitored invocation records exactly one counter increment and
//! exactly one latency sample, on every path:
//!
//! - `Ok`  -> `status="success"`, value returned unchanged
//! - `Err` -> `status="failure"`, error returned unchanged
//! - future dropped before completion, or a panic unwinding through a
//!   monitored closure -> `status="failure"`
//!
//! Latency is wall clock, including time spent suspended. The clock starts on
//! the first poll; a monitored future dropped without ever being polled
//! records nothing.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use landsearch_core::error::Result;

use super::metrics::{CounterVec, HistogramVec, MetricsRegistry};

pub const OPERATIONS_TOTAL: &str = "pinecone_operations_total";
pub const OPERATION_LATENCY_SECONDS: &str = "pinecone_operation_latency_seconds";

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAILURE: &str = "failure";

pub struct OperationMetrics {
    registry: Arc<MetricsRegistry>,
    operations: Arc<CounterVec<2>>,
    latency: Arc<HistogramVec<1>>,
}

impl OperationMetrics {
    pub fn new() -> Result<Self> {
        Self::with_registry(Arc::new(MetricsRegistry::new()))
    }

    pub fn with_registry(registry: Arc<MetricsRegistry>) -> Result<Self> {
        let operations = Arc::new(CounterVec::new(
            OPERATIONS_TOTAL,
            "Total number of Pinecone operations",
            ["operation_type", "status"],
        ));
        let latency = Arc::new(HistogramVec::new(
            OPERATION_LATENCY_SECONDS,
            "Latency of Pinecone operations",
            ["operation_type"],
        ));

        registry.register(operations.clone())?;
        registry.register(latency.clone())?;

        Ok(Self { registry, operations, latency })
    }

    /// Start timing an operation. Prefer [`monitor`](Self::monitor) or
    /// [`monitor_blocking`](Self::monitor_blocking); an unfinished span
    /// records a failure when dropped.
    pub fn start<'a>(&'a self, operation_type: &'a str) -> OperationSpan<'a> {
        OperationSpan {
            metrics: self,
            operation_type,
            start: Instant::now(),
            status: None,
        }
    }

    pub async fn monitor<F, T, E>(&self, operation_type: &str, op: F) -> std::result::Result<T, E>
    where
        F: Future<Output = std::result::Result<T, E>>,
    {
        let span = self.start(operation_type);
        let out = op.await;
        span.finish(out.is_ok());
        out
    }

    pub fn monitor_blocking<F, T, E>(&self, operation_type: &str, op: F) -> std::result::Result<T, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
    {
        let span = self.start(operation_type);
        let out = op();
        span.finish(out.is_ok());
        out
    }

    /// Wrap `f` so every call through the returned value is monitored.
    pub fn wrap<F>(self: &Arc<Self>, operation_type: impl Into<Arc<str>>, f: F) -> MonitoredFn<F> {
        MonitoredFn {
            metrics: Arc::clone(self),
            operation_type: operation_type.into(),
            f,
        }
    }

    pub fn registry(&self) -> &Arc<MetricsRegistry> {
        &self.registry
    }

    pub fn count(&self, operation_type: &str, status: &str) -> u64 {
        self.operations.get([operation_type, status])
    }

    pub fn latency_samples(&self, operation_type: &str) -> u64 {
        self.latency.sample_count([operation_type])
    }

    /// Total recorded latency for one operation type, in seconds.
    pub fn latency_sum(&self, operation_type: &str) -> f64 {
        self.latency.sample_sum([operation_type])
    }
}

/// Timed span over one operation. Metrics are written when it is dropped.
pub struct OperationSpan<'a> {
    metrics: &'a OperationMetrics,
    operation_type: &'a str,
    start: Instant,
    status: Option<&'static str>,
}

impl OperationSpan<'_> {
    /// Mark the outcome and close the span.
    pub fn finish(mut self, ok: bool) {
        self.status = Some(if ok { STATUS_SUCCESS } else { STATUS_FAILURE });
    }
}

impl Drop for OperationSpan<'_> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        let status = match self.status {
            Some(s) => s,
            None => {
                tracing::debug!(
                    operation_type = self.operation_type,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "operation abandoned before completion"
                );
                STATUS_FAILURE
            }
        };

        self.metrics.operations.inc([self.operation_type, status]);
        self.metrics.latency.observe_duration([self.operation_type], elapsed);
    }
}

/// A function bound to an operation label. Arguments are passed as a single
/// value; use a tuple for several.
pub struct MonitoredFn<F> {
    metrics: Arc<OperationMetrics>,
    operation_type: Arc<str>,
    f: F,
}

impl<F> MonitoredFn<F> {
    pub async fn call<A, Fut, T, E>(&self, args: A) -> std::result::Result<T, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        // Clock starts before `f` runs so synchronous work done while building
        // the future is timed too.
        let span = self.metrics.start(&self.operation_type);
        let out = (self.f)(args).await;
        span.finish(out.is_ok());
        out
    }

    pub fn call_blocking<A, T, E>(&self, args: A) -> std::result::Result<T, E>
    where
        F: Fn(A) -> std::result::Result<T, E>,
    {
        self.metrics.monitor_blocking(&self.operation_type, || (self.f)(args))
    }

    pub fn operation_type(&self) -> &str {
        &self.operation_type
    }
}
