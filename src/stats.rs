use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Delivery accumulator for one run. Derived metrics are computed on demand.
#[derive(Debug, Clone)]
pub struct RunStatistics {
    successful: u64,
    failed: u64,
    started: Instant,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(started: Instant) -> Self {
        Self {
            successful: 0,
            failed: 0,
            started,
        }
    }

    pub fn record_success(&mut self) {
        self.successful += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn successful(&self) -> u64 {
        self.successful
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn attempts(&self) -> u64 {
        self.successful + self.failed
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Attempts per second over `elapsed`; zero before any time has passed.
    pub fn throughput_over(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 {
            self.attempts() as f64 / secs
        } else {
            0.0
        }
    }

    pub fn throughput(&self) -> f64 {
        self.throughput_over(self.elapsed())
    }

    /// Percentage of attempts that succeeded; zero when nothing was attempted.
    pub fn success_rate(&self) -> f64 {
        match self.attempts() {
            0 => 0.0,
            attempts => self.successful as f64 / attempts as f64 * 100.0,
        }
    }

    pub fn summary(&self) -> RunSummary {
        let elapsed = self.elapsed();
        RunSummary {
            elapsed_seconds: elapsed.as_secs_f64(),
            successful: self.successful,
            failed: self.failed,
            requests_per_second: self.throughput_over(elapsed),
            success_rate: self.success_rate(),
        }
    }
}

impl Default for RunStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time snapshot of a run's statistics and derived metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub elapsed_seconds: f64,
    pub successful: u64,
    pub failed: u64,
    pub requests_per_second: f64,
    pub success_rate: f64,
}

impl RunSummary {
    pub fn attempts(&self) -> u64 {
        self.successful + self.failed
    }
}

impl core::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Elapsed: {:.1}s | Successful: {} | Failed: {} | Req/s: {:.1} | Success Rate: {:.1}%",
            self.elapsed_seconds, self.successful, self.failed, self.requests_per_second, self.success_rate
        )
    }
}
