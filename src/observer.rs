//! Run observers decide how progress and final statistics are presented.
//! The run loops never print on their own.

use crate::error::FrameError;
use crate::reading::Reading;
use crate::stats::RunSummary;
use crate::transmit::Outcome;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Configured duration elapsed.
    DurationElapsed,
    /// Cancellation was observed between iterations.
    Cancelled,
    /// The instrument feed closed.
    FeedClosed,
}

impl core::fmt::Display for StopReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StopReason::DurationElapsed => write!(f, "duration elapsed"),
            StopReason::Cancelled => write!(f, "stopped by user"),
            StopReason::FeedClosed => write!(f, "instrument feed closed"),
        }
    }
}

/// Callbacks from the run loops. All methods default to doing nothing.
pub trait RunObserver {
    /// Called after every transmission attempt, once statistics include it.
    fn on_attempt(&mut self, _reading: &Reading, _outcome: &Outcome, _progress: &RunSummary) {}

    /// Called when an instrument frame is dropped.
    fn on_frame_rejected(&mut self, _line: &str, _error: &FrameError) {}

    /// Called exactly once when the loop terminates.
    fn on_finished(&mut self, _summary: &RunSummary, _reason: StopReason) {}
}

impl<O: RunObserver + ?Sized> RunObserver for &mut O {
    fn on_attempt(&mut self, reading: &Reading, outcome: &Outcome, progress: &RunSummary) {
        (**self).on_attempt(reading, outcome, progress);
    }

    fn on_frame_rejected(&mut self, line: &str, error: &FrameError) {
        (**self).on_frame_rejected(line, error);
    }

    fn on_finished(&mut self, summary: &RunSummary, reason: StopReason) {
        (**self).on_finished(summary, reason);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl RunObserver for NullObserver {}

/// Logs loop events through `tracing`.
///
/// Successful sends are logged at DEBUG unless the observer announces them,
/// in which case every sent reading is logged at INFO.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver {
    announce_sends: bool,
}

impl TracingObserver {
    pub const fn new() -> Self {
        Self { announce_sends: false }
    }

    /// Observer for the forwarder, where every forwarded reading is reported.
    pub const fn announcing_sends() -> Self {
        Self { announce_sends: true }
    }
}

impl RunObserver for TracingObserver {
    fn on_attempt(&mut self, reading: &Reading, outcome: &Outcome, progress: &RunSummary) {
        match outcome {
            Outcome::Success if self.announce_sends => info!("📡 Sent: {}", reading),
            Outcome::Success => debug!("📡 Sent: {} | {}", reading, progress),
            Outcome::Failure(error) => warn!("❌ Error sending data: {} | {}", error, progress),
        }
    }

    fn on_frame_rejected(&mut self, line: &str, error: &FrameError) {
        warn!("Dropped frame {:?}: {}", line, error);
    }

    fn on_finished(&mut self, summary: &RunSummary, reason: StopReason) {
        info!(
            reason = %reason,
            elapsed_s = summary.elapsed_seconds,
            successful = summary.successful,
            failed = summary.failed,
            requests_per_second = summary.requests_per_second,
            success_rate = summary.success_rate,
            "Run finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn log_at_info(observer: &mut TracingObserver, outcome: &Outcome) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let reading = Reading {
            temperature: 22.1,
            humidity: 45.2,
            methane: 2.0,
            light: 800.0,
            atmospheric_pressure: 1013.0,
        };
        let progress = RunSummary {
            elapsed_seconds: 1.0,
            successful: 1,
            failed: 0,
            requests_per_second: 1.0,
            success_rate: 100.0,
        };
        tracing::subscriber::with_default(subscriber, || {
            observer.on_attempt(&reading, outcome, &progress);
        });
        captured.text()
    }

    #[test]
    fn test_forwarder_sends_visible_at_info() {
        let logs = log_at_info(&mut TracingObserver::announcing_sends(), &Outcome::Success);
        assert!(logs.contains("Sent"), "{}", logs);
        assert!(logs.contains("INFO"), "{}", logs);
    }

    #[test]
    fn test_default_sends_hidden_at_info() {
        let logs = log_at_info(&mut TracingObserver::new(), &Outcome::Success);
        assert!(logs.is_empty(), "{}", logs);
    }

    #[test]
    fn test_failures_always_logged() {
        let failure = Outcome::Failure(TransportError::Status {
            status: 500,
            body: "Failed to store sensor data".to_string(),
        });
        let logs = log_at_info(&mut TracingObserver::new(), &failure);
        assert!(logs.contains("Error sending data"), "{}", logs);
        assert!(logs.contains("WARN"), "{}", logs);
    }
}
