//! Service config loader (strict parsing).

pub mod schema;

use std::fs;

use landsearch_core::error::{LandSearchError, Result};

pub use schema::{AppConfig, LoggingSection, MetricsSection, RateLimitSection, ServerSection};

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| LandSearchError::InvalidConfiguration(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    let cfg: AppConfig = serde_yaml::from_str(s)
        .map_err(|e| LandSearchError::InvalidConfiguration(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
