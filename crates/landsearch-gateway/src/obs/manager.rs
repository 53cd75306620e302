//! HTTP request metrics owned by one service instance.
//!
//! Label values are taken verbatim from callers. Keep `endpoint` bounded (route
//! templates, not raw ids) or the number of series grows without limit; the
//! HTTP layer passes the matched route for exactly this reason.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use landsearch_core::error::Result;

use super::metrics::{CounterVec, HistogramVec, MetricsRegistry};

pub const REQUESTS_TOTAL: &str = "app_http_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "app_http_request_duration_seconds";
pub const ERRORS_TOTAL: &str = "app_error_total";

pub struct MetricsManager {
    registry: Arc<MetricsRegistry>,
    request_counter: Arc<CounterVec<3>>,
    request_latency: Arc<HistogramVec<2>>,
    error_counter: Arc<CounterVec<1>>,
}

impl MetricsManager {
    /// Manager with its own private registry.
    pub fn new() -> Result<Self> {
        Self::with_registry(Arc::new(MetricsRegistry::new()))
    }

    /// Register the request families into a shared registry.
    pub fn with_registry(registry: Arc<MetricsRegistry>) -> Result<Self> {
        let request_counter = Arc::new(CounterVec::new(
            REQUESTS_TOTAL,
            "Total HTTP requests",
            ["method", "endpoint", "status"],
        ));
        let request_latency = Arc::new(HistogramVec::new(
            REQUEST_DURATION_SECONDS,
            "HTTP request latency",
            ["method", "endpoint"],
        ));
        let error_counter = Arc::new(CounterVec::new(
            ERRORS_TOTAL,
            "Total number of errors",
            ["error_type"],
        ));

        registry.register(request_counter.clone())?;
        registry.register(request_latency.clone())?;
        registry.register(error_counter.clone())?;

        Ok(Self {
            registry,
            request_counter,
            request_latency,
            error_counter,
        })
    }

    pub fn increment_request_count(&self, method: &str, endpoint: &str, status: &str) {
        self.request_counter.inc([method, endpoint, status]);
    }

    /// Record one request duration in seconds.
    ///
    /// Negative or non-finite durations are a caller bug and return
    /// `InvalidMeasurement` without recording anything.
    pub fn observe_request_latency(&self, method: &str, endpoint: &str, duration_seconds: f64) -> Result<()> {
        self.request_latency.observe([method, endpoint], duration_seconds)
    }

    pub fn observe_request_duration(&self, method: &str, endpoint: &str, duration: Duration) {
        self.request_latency.observe_duration([method, endpoint], duration);
    }

    pub fn increment_error_count(&self, error_type: &str) {
        self.error_counter.inc([error_type]);
    }

    /// Text exposition of the whole registry, including families registered by
    /// other owners of the same registry.
    pub fn metrics_snapshot(&self) -> Bytes {
        Bytes::from(self.registry.render())
    }

    pub fn registry(&self) -> &Arc<MetricsRegistry> {
        &self.registry
    }

    pub fn request_count(&self, method: &str, endpoint: &str, status: &str) -> u64 {
        self.request_counter.get([method, endpoint, status])
    }

    /// Distinct `{method, endpoint, status}` series in the request counter.
    pub fn request_series(&self) -> usize {
        self.request_counter.series_len()
    }

    pub fn latency_sample_count(&self, method: &str, endpoint: &str) -> u64 {
        self.request_latency.sample_count([method, endpoint])
    }

    pub fn error_count(&self, error_type: &str) -> u64 {
        self.error_counter.get([error_type])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landsearch_core::LandSearchError;

    #[test]
    fn negative_latency_is_rejected() {
        let m = MetricsManager::new().unwrap();
        let err = m.observe_request_latency("GET", "/x", -1.0).unwrap_err();
        assert!(matches!(err, LandSearchError::InvalidMeasurement(_)));
        assert_eq!(m.latency_sample_count("GET", "/x"), 0);

        let snap = String::from_utf8(m.metrics_snapshot().to_vec()).unwrap();
        assert!(!snap.contains("app_http_request_duration_seconds_count"));
    }

    #[test]
    fn two_managers_on_one_registry_conflict() {
        let reg = Arc::new(MetricsRegistry::new());
        assert!(MetricsManager::with_registry(reg.clone()).is_ok());
        assert!(MetricsManager::with_registry(reg).is_err());
    }

    #[test]
    fn independent_managers_do_not_share_state() {
        let a = MetricsManager::new().unwrap();
        let b = MetricsManager::new().unwrap();
        a.increment_error_count("Timeout");
        assert_eq!(a.error_count("Timeout"), 1);
        assert_eq!(b.error_count("Timeout"), 0);
    }
}
