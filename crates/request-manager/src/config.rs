//! Request manager configuration.

use crate::error::ConfigError;
use humantime_serde::re::humantime;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Timeout used by [`RequestManager::create_default`](crate::RequestManager::create_default).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for a [`RequestManager`](crate::RequestManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Timeout applied when the caller does not pick one
    #[serde(with = "humantime_serde")]
    pub default_timeout: Duration,
    /// Log replies for unknown or already resolved requests at debug level
    pub log_unmatched: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_REQUEST_TIMEOUT,
            log_unmatched: true,
        }
    }
}

impl ManagerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RPC_DEFAULT_TIMEOUT`: humantime duration such as `30s` or `1m 30s` (default: 60s)
    /// - `RPC_LOG_UNMATCHED`: log replies nobody waits for (default: true)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("RPC_DEFAULT_TIMEOUT") {
            config.default_timeout =
                humantime::parse_duration(raw.trim()).map_err(|e| ConfigError::Env {
                    var: "RPC_DEFAULT_TIMEOUT",
                    reason: e.to_string(),
                })?;
        }

        if let Ok(raw) = env::var("RPC_LOG_UNMATCHED") {
            config.log_unmatched = raw.to_lowercase() != "false" && raw != "0";
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "default timeout cannot be 0".into(),
            ));
        }
        Ok(())
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }
}
