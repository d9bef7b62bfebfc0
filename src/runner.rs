//! Sampling and transmission loops.
//!
//! Two cadences: the poll-driven loop builds a reading, sends it and sleeps a
//! fixed delay; the push-driven loop waits for the next instrument line. Both
//! await every send before the next tick and only observe cancellation at
//! iteration boundaries, so an in-flight send always completes.

use crate::config::PollConfig;
use crate::error::FrameError;
use crate::observer::{RunObserver, StopReason};
use crate::reading::Reading;
use crate::source::SourceAdapter;
use crate::stats::{RunStatistics, RunSummary};
use crate::transmit::{Outcome, Transmitter};
use core::convert::Infallible;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Running,
    Terminating(StopReason),
    Reported(StopReason),
}

/// Final result of a run, reported once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    pub summary: RunSummary,
    pub reason: StopReason,
}

pub struct RunLoop<T, O> {
    transmitter: T,
    observer: O,
    cancel: CancellationToken,
    phase: RunPhase,
}

impl<T: Transmitter, O: RunObserver> RunLoop<T, O> {
    pub fn new(transmitter: T, observer: O) -> Self {
        Self {
            transmitter,
            observer,
            cancel: CancellationToken::new(),
            phase: RunPhase::Running,
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops the loop at the next iteration boundary.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_parts(self) -> (T, O) {
        (self.transmitter, self.observer)
    }

    /// Poll-driven loop for sources that never fail.
    ///
    /// Runs until `config.duration()` has elapsed (unless `config.infinite`)
    /// or the cancellation token fires.
    pub async fn run_polling<S>(&mut self, source: &mut S, config: &PollConfig) -> RunReport
    where
        S: SourceAdapter<Input = (), Error = Infallible>,
    {
        let duration = config.duration();
        let delay = config.delay();
        let mut stats = RunStatistics::new();
        self.phase = RunPhase::Running;

        if config.infinite {
            info!("Starting run indefinitely with {:?} delay between requests", delay);
        } else {
            info!("Starting run for {} seconds with {:?} delay between requests", config.duration_s, delay);
        }

        while self.phase == RunPhase::Running {
            if self.cancel.is_cancelled() {
                self.phase = RunPhase::Terminating(StopReason::Cancelled);
                break;
            }
            if !config.infinite && stats.elapsed() >= duration {
                self.phase = RunPhase::Terminating(StopReason::DurationElapsed);
                break;
            }

            let elapsed_s = stats.elapsed().as_secs_f64();
            let reading = match source.produce_reading(&(), elapsed_s) {
                Ok(reading) => reading,
                Err(never) => match never {},
            };
            self.transmit(&mut stats, reading).await;

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    self.phase = RunPhase::Terminating(StopReason::Cancelled);
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        self.report(&stats)
    }

    /// Push-driven loop: one reading per instrument line.
    ///
    /// Blank lines are skipped and malformed frames are dropped without
    /// touching the statistics. Ends when the feed closes or on cancellation.
    pub async fn run_push<S>(&mut self, source: &mut S, frames: &mut mpsc::Receiver<String>) -> RunReport
    where
        S: SourceAdapter<Input = str, Error = FrameError>,
    {
        let mut stats = RunStatistics::new();
        self.phase = RunPhase::Running;

        while self.phase == RunPhase::Running {
            let line = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    self.phase = RunPhase::Terminating(StopReason::Cancelled);
                    continue;
                }
                line = frames.recv() => line,
            };

            let Some(line) = line else {
                self.phase = RunPhase::Terminating(StopReason::FeedClosed);
                continue;
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let elapsed_s = stats.elapsed().as_secs_f64();
            match source.produce_reading(line, elapsed_s) {
                Ok(reading) => self.transmit(&mut stats, reading).await,
                Err(e) => self.observer.on_frame_rejected(line, &e),
            }
        }

        self.report(&stats)
    }

    async fn transmit(&mut self, stats: &mut RunStatistics, reading: Reading) {
        let outcome = self.transmitter.send(&reading).await;
        match outcome {
            Outcome::Success => stats.record_success(),
            Outcome::Failure(_) => stats.record_failure(),
        }
        self.observer.on_attempt(&reading, &outcome, &stats.summary());
    }

    fn report(&mut self, stats: &RunStatistics) -> RunReport {
        let reason = match self.phase {
            RunPhase::Terminating(reason) => reason,
            // Only reachable if a loop exits without choosing a reason
            RunPhase::Running | RunPhase::Reported(_) => StopReason::Cancelled,
        };

        let summary = stats.summary();
        self.observer.on_finished(&summary, reason);
        self.phase = RunPhase::Reported(reason);

        RunReport { summary, reason }
    }
}

/// Cancels `token` on Ctrl+C.
pub fn cancel_on_interrupt(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, stopping after the current request");
                token.cancel();
            }
            Err(e) => error!("Failed to listen for interrupt: {}", e),
        }
    })
}
