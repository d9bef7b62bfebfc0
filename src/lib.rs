//! # Sensor Bus
//!
//! Environmental sensor telemetry generation and delivery. Readings of five
//! sensors (temperature, humidity, methane, light, atmospheric pressure) are
//! produced once per tick and POSTed to an ingestion endpoint.
//!
//! ## Operating modes
//!
//! - **Forwarder**: parses frames from a serial instrument and synthesizes the
//!   one field the instrument does not report (atmospheric pressure).
//! - **Stress harness**: fabricates every field from the signal model to load
//!   test the ingestion endpoint.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sensorbus::config::{EndpointConfig, PollConfig};
//! use sensorbus::observer::TracingObserver;
//! use sensorbus::profile::ProfileSet;
//! use sensorbus::runner::RunLoop;
//! use sensorbus::signal::GaussianNoise;
//! use sensorbus::source::SyntheticSource;
//! use sensorbus::transmit::HttpTransmitter;
//!
//! # async fn run() -> Result<(), sensorbus::error::ConfigError> {
//! let profiles = ProfileSet::synthetic();
//! let mut source = SyntheticSource::new(&profiles, GaussianNoise::from_entropy());
//! let transmitter = HttpTransmitter::new(&EndpointConfig::default());
//!
//! let mut run_loop = RunLoop::new(transmitter, TracingObserver::new());
//! let report = run_loop.run_polling(&mut source, &PollConfig::new(60, 1.0, false)?).await;
//! println!("{}", report.summary);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`signal`] - Base + diurnal + noise synthesis
//! - [`profile`] - Per-sensor profiles and clamping domains
//! - [`frame`] - Instrument frame parsing
//! - [`source`] - Reading producers (hardware and synthetic)
//! - [`transmit`] - Delivery to the ingestion endpoint
//! - [`runner`] - Poll-driven and push-driven run loops
//! - [`stats`] - Delivery statistics
//! - [`observer`] - Progress and final report callbacks
//! - [`device`] - Serial instrument feed
//! - [`config`] - Endpoint, cadence and device configuration

#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod device;
pub mod error;
pub mod frame;
pub mod observer;
pub mod profile;
pub mod reading;
pub mod runner;
pub mod signal;
pub mod source;
pub mod stats;
pub mod transmit;

// Re-export main public types for convenience
pub use error::{FrameError, SensorbusError, TransportError};
pub use profile::{ProfileSet, SensorProfile};
pub use reading::{Reading, SensorKind};
pub use runner::{RunLoop, RunReport};
pub use signal::SignalModel;
pub use stats::{RunStatistics, RunSummary};
pub use transmit::{HttpTransmitter, Outcome, Transmitter};
