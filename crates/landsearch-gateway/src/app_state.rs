//! Shared application state.
//!
//! Request metrics and operation metrics register into one registry so a
//! single `/metrics` scrape exposes both.

use std::sync::Arc;

use landsearch_core::error::Result;
use landsearch_core::RateLimiter;

use crate::config::AppConfig;
use crate::obs::{MetricsManager, MetricsRegistry, OperationMetrics};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    operations: Arc<OperationMetrics>,
}

struct AppStateInner {
    cfg: AppConfig,
    metrics: MetricsManager,
    limiter: Option<RateLimiter>,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: AppConfig) -> Result<Self> {
        let registry = Arc::new(MetricsRegistry::new());
        let metrics = MetricsManager::with_registry(Arc::clone(&registry))?;
        let operations = Arc::new(OperationMetrics::with_registry(registry)?);

        let limiter = cfg.rate_limit.build_limiter()?;
        match &limiter {
            Some(l) => tracing::info!(rate = l.rate(), burst = l.burst(), "request rate limiting enabled"),
            None => tracing::info!("request rate limiting disabled"),
        }

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, metrics, limiter }),
            operations,
        })
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &MetricsManager {
        &self.inner.metrics
    }

    pub fn limiter(&self) -> Option<&RateLimiter> {
        self.inner.limiter.as_ref()
    }

    /// Shared operation monitor for handlers and background work.
    pub fn operations(&self) -> Arc<OperationMetrics> {
        Arc::clone(&self.operations)
    }
}
