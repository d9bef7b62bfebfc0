use crate::reading::SensorKind;
use thiserror::Error;

/// Malformed instrument frame. The frame is dropped and the loop continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("field {index} ({sensor}) is not a valid number: {value:?}")]
    InvalidField {
        index: usize,
        sensor: SensorKind,
        value: String,
    },
}

/// Delivery failure for a single reading. Counted as a failed attempt, never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("failed to serialize reading: {0}")]
    Serialization(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("profile for {sensor}: {reason}")]
    InvalidProfile { sensor: SensorKind, reason: String },
    #[error("missing profile for {0}")]
    MissingProfile(SensorKind),
    #[error("invalid delay {0}s")]
    InvalidDelay(f64),
}

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to open instrument on {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(#[source] serialport::Error),
    #[error("failed to start instrument reader: {0}")]
    Reader(#[from] std::io::Error),
}

/// Fatal errors surfaced to the process entry points.
#[derive(Debug, Error)]
pub enum SensorbusError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

pub type Result<T, E = SensorbusError> = core::result::Result<T, E>;
