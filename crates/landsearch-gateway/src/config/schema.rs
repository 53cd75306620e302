use std::net::SocketAddr;

use serde::Deserialize;
use landsearch_core::error::{LandSearchError, Result};
use landsearch_core::RateLimiter;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub rate_limit: RateLimitSection,

    #[serde(default)]
    pub metrics: MetricsSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(LandSearchError::InvalidConfiguration(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.rate_limit.validate()?;
        self.logging.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            api_version: default_api_version(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            LandSearchError::InvalidConfiguration(format!(
                "server.listen must be a valid socket address ({}): {e}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}
fn default_api_version() -> String {
    "v1".into()
}

/// `requests` admitted per `period_secs`, with bursts of up to `requests`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitSection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_requests")]
    pub requests: u32,

    #[serde(default = "default_period_secs")]
    pub period_secs: u64,
}

impl Default for RateLimitSection {
    fn default() -> Self {
        Self {
            enabled: true,
            requests: default_requests(),
            period_secs: default_period_secs(),
        }
    }
}

impl RateLimitSection {
    pub fn validate(&self) -> Result<()> {
        if self.requests == 0 {
            return Err(LandSearchError::InvalidConfiguration(
                "rate_limit.requests must be at least 1".into(),
            ));
        }
        if self.period_secs == 0 {
            return Err(LandSearchError::InvalidConfiguration(
                "rate_limit.period_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Tokens per second.
    pub fn rate(&self) -> f64 {
        f64::from(self.requests) / self.period_secs as f64
    }

    /// `None` when limiting is disabled.
    pub fn build_limiter(&self) -> Result<Option<RateLimiter>> {
        if !self.enabled {
            return Ok(None);
        }
        RateLimiter::new(self.rate(), f64::from(self.requests)).map(Some)
    }
}

fn default_true() -> bool {
    true
}
fn default_requests() -> u32 {
    100
}
fn default_period_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { level: default_level() }
    }
}

impl LoggingSection {
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.level.to_ascii_lowercase().as_str()) {
            return Err(LandSearchError::InvalidConfiguration(format!(
                "logging.level must be one of {LOG_LEVELS:?}, got {}",
                self.level
            )));
        }
        Ok(())
    }
}

fn default_level() -> String {
    "info".into()
}
