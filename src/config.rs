//! Engine configuration from environment variables or a TOML file.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

const DEFAULT_BUSINESS_TIMEZONE: &str = "America/Los_Angeles";
const DEFAULT_LOCK_WAIT_MS: u64 = 2_000;

/// Scheduling engine configuration.
///
/// The timezone name is resolved when the engine is constructed; an
/// unresolvable name fails startup with [`EngineError::Configuration`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// IANA name of the business timezone.
    #[serde(default = "default_business_timezone")]
    pub business_timezone: String,
    /// Bounded wait for the per-day scheduling lock, in milliseconds.
    #[serde(default = "default_lock_wait_ms")]
    pub lock_wait_ms: u64,
}

fn default_business_timezone() -> String {
    DEFAULT_BUSINESS_TIMEZONE.to_string()
}

fn default_lock_wait_ms() -> u64 {
    DEFAULT_LOCK_WAIT_MS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            business_timezone: default_business_timezone(),
            lock_wait_ms: default_lock_wait_ms(),
        }
    }
}

/// File layout: a single `[scheduling]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    scheduling: Option<EngineConfig>,
}

impl EngineConfig {
    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `BUSINESS_TIMEZONE` (optional, default: `America/Los_Angeles`)
    /// - `SCHEDULING_LOCK_WAIT_MS` (optional, default: 2000)
    ///
    /// # Errors
    /// Returns [`EngineError::Configuration`] if `SCHEDULING_LOCK_WAIT_MS`
    /// is set but not a valid integer.
    pub fn from_env() -> Result<Self, EngineError> {
        let business_timezone = std::env::var("BUSINESS_TIMEZONE")
            .unwrap_or_else(|_| default_business_timezone());
        let lock_wait_ms = match std::env::var("SCHEDULING_LOCK_WAIT_MS") {
            Ok(raw) => raw.parse().map_err(|_| {
                EngineError::Configuration(format!(
                    "SCHEDULING_LOCK_WAIT_MS must be an integer, got '{}'",
                    raw
                ))
            })?,
            Err(_) => default_lock_wait_ms(),
        };

        Ok(Self {
            business_timezone,
            lock_wait_ms,
        })
    }

    /// Load configuration from a TOML file.
    ///
    /// A missing `[scheduling]` table yields the defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            EngineError::Configuration(format!("failed to read config file: {}", e))
        })?;

        let file: ConfigFile = toml::from_str(&content).map_err(|e| {
            EngineError::Configuration(format!("failed to parse config file: {}", e))
        })?;

        Ok(file.scheduling.unwrap_or_default())
    }

    /// Bounded lock wait as a [`Duration`].
    pub fn lock_wait(&self) -> Duration {
        Duration::from_millis(self.lock_wait_ms)
    }
}
