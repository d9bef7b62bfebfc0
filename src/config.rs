//! Run configuration with defaults.
//!
//! Every section deserializes with defaults, so a JSON file only needs the
//! keys it overrides. Command-line flags are applied on top by the binaries.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const SENSORS_PATH: &str = "/api/sensors";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

pub const DEFAULT_DURATION_S: u64 = 3600;
pub const DEFAULT_DELAY_S: f64 = 1.0;

pub const DEFAULT_DEVICE_PORT: &str = "/dev/ttyACM0";
pub const DEFAULT_BAUD_RATE: u32 = 9600;
// 1 / timeout is the rate at which the port is polled
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EndpointConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl EndpointConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Full ingestion URL, tolerating a trailing slash on the base.
    pub fn sensors_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), SENSORS_PATH)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

/// Cadence and termination for the poll-driven loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PollConfig {
    pub duration_s: u64,
    pub delay_s: f64,
    pub infinite: bool,
}

impl PollConfig {
    pub fn new(duration_s: u64, delay_s: f64, infinite: bool) -> Result<Self, ConfigError> {
        let config = Self {
            duration_s,
            delay_s,
            infinite,
        };
        config.validate()?;
        Ok(config)
    }

    /// Accepts any delay representable as a `Duration`: finite, non-negative
    /// and within range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Duration::try_from_secs_f64(self.delay_s)
            .map(|_| ())
            .map_err(|_| ConfigError::InvalidDelay(self.delay_s))
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_s)
    }

    /// Inter-tick delay. A delay that skipped validation saturates: out of range
    /// values wait forever, negative or NaN values do not wait.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_s.max(0.0)).unwrap_or(Duration::MAX)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            duration_s: DEFAULT_DURATION_S,
            delay_s: DEFAULT_DELAY_S,
            infinite: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceConfig {
    pub port: String,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
}

impl DeviceConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_DEVICE_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

/// Optional JSON configuration file shared by both binaries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SensorbusConfig {
    pub endpoint: EndpointConfig,
    pub poll: PollConfig,
    pub device: DeviceConfig,
}

impl SensorbusConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.poll.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
