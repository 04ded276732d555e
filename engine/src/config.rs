//! Engine configuration with TOML support.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long a fast-tier cache entry stays acceptable.
pub const DEFAULT_CACHE_LONG_TIMEOUT_SECS: u64 = 3600;

/// Configuration for the identify engine.
///
/// Can be loaded from TOML via [`EngineConfig::from_toml_str`] or built
/// programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fast-tier cache acceptance window, in seconds.
    #[serde(default = "default_cache_long_timeout")]
    pub cache_long_timeout_secs: u64,

    /// Cap on how long a request waits for its remote clauses to resolve
    /// before giving up with a timeout. The background check keeps running
    /// either way. `None` waits indefinitely.
    #[serde(default)]
    pub wait_deadline_secs: Option<u64>,
}

fn default_cache_long_timeout() -> u64 {
    DEFAULT_CACHE_LONG_TIMEOUT_SECS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_long_timeout_secs: DEFAULT_CACHE_LONG_TIMEOUT_SECS,
            wait_deadline_secs: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("bad engine config: {0}")]
    Toml(#[from] toml::de::Error),
}
