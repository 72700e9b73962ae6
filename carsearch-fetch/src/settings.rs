//! Catalog connection settings.
//!
//! Settings come from defaults, then `CARSEARCH_*` environment variables.
//! Nothing is read from or written to disk.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::retry::RetryPolicy;

/// Default catalog service base URL.
pub const DEFAULT_BASE_URL: &str = "https://vpic.nhtsa.dot.gov/api/vehicles";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "CARSEARCH_BASE_URL";
/// Environment variable overriding the request timeout (seconds).
pub const ENV_TIMEOUT_SECS: &str = "CARSEARCH_TIMEOUT_SECS";
/// Environment variable overriding the retry base delay (seconds).
pub const ENV_RETRY_DELAY_SECS: &str = "CARSEARCH_RETRY_DELAY_SECS";
/// Environment variable setting a retry ceiling (`0` or unset means unbounded).
pub const ENV_MAX_ATTEMPTS: &str = "CARSEARCH_MAX_ATTEMPTS";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

// ============================================================================
// Catalog Settings
// ============================================================================

/// Settings for talking to the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Base URL the endpoint paths are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retry policy for every catalog request.
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry: RetryPolicy::default(),
        }
    }
}

impl CatalogSettings {
    /// Loads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings using `lookup` to resolve environment variables.
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            settings.base_url = base_url.trim().to_string();
        }

        if let Some(secs) = parse_var::<u64>(&lookup, ENV_TIMEOUT_SECS) {
            settings.timeout_secs = secs;
        }

        if let Some(secs) = parse_var::<u64>(&lookup, ENV_RETRY_DELAY_SECS) {
            settings.retry.base_delay_secs = secs;
        }

        if let Some(max) = parse_var::<u32>(&lookup, ENV_MAX_ATTEMPTS) {
            settings.retry = settings.retry.with_max_attempts((max > 0).then_some(max));
        }

        debug!(?settings, "Resolved catalog settings");
        settings
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable setting");
            None
        }
    }
}
