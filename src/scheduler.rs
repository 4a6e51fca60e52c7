use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info, info_span};

use crate::error::Result;
use crate::services::CycleOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Fixed-interval loop: first cycle immediately, then one cycle per
/// `interval` measured from the start of the previous one. Cycles never
/// overlap and a running cycle is never cancelled.
pub struct Scheduler {
    interval: Duration,
    state: watch::Sender<SchedulerState>,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        let (state, _) = watch::channel(SchedulerState::Idle);
        Self { interval, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    /// Runs until `shutdown` is cancelled and returns the number of cycles
    /// that were started. A failed cycle is logged and the loop re-arms.
    pub async fn run<F, Fut>(&self, mut job: F, shutdown: CancellationToken) -> u64
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<CycleOutcome>>,
    {
        info!(interval_secs = self.interval.as_secs(), "Scheduler started");

        let mut next_tick = Instant::now();
        let mut cycles: u64 = 0;

        loop {
            self.state.send_replace(SchedulerState::Idle);

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = sleep_until(next_tick) => {}
            }

            if shutdown.is_cancelled() {
                break;
            }

            let started = Instant::now();
            next_tick = started + self.interval;
            cycles += 1;
            self.state.send_replace(SchedulerState::Running);

            let span = info_span!("cycle", cycle = cycles);
            match job().instrument(span).await {
                Ok(outcome) => info!(
                    cycle = cycles,
                    flagged = outcome.flagged,
                    alerted = outcome.alerted,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Cycle completed"
                ),
                Err(e) => error!(
                    cycle = cycles,
                    error.kind = e.kind(),
                    error = %e,
                    "Cycle failed, retrying at next interval"
                ),
            }
        }

        self.state.send_replace(SchedulerState::Stopped);
        info!(cycles, "Shutting down process");

        cycles
    }
}
