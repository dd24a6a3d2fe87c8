//! Daily Trigger Scheduler
//!
//! One fixed wall-clock trigger per day (UTC), checked on a fixed poll
//! interval (60 s in production). When the trigger is due the analysis cycle
//! runs to completion before the next check, so runs never overlap.
//!
//! There is no catch-up: if the process is down at the trigger time that
//! day's run is skipped and the next one is tomorrow's.
//!
//! Each run executes in its own task. An error or a panic inside a run is
//! logged and the loop keeps going.

use chrono::{DateTime, Days, NaiveTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::email::MailTransport;
use crate::pipeline::{CycleError, CycleOutcome, DailyAnalysis};

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// First occurrence of `at` strictly after `now`.
pub fn next_occurrence(at: NaiveTime, now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive().and_time(at).and_utc();
    if today > now {
        today
    } else {
        today + Days::new(1)
    }
}

/// A single time-of-day trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTrigger {
    at: NaiveTime,
    next_run: DateTime<Utc>,
}

impl DailyTrigger {
    /// Register the trigger at `now`. If today's time has already passed the
    /// first run is tomorrow.
    pub fn new(at: NaiveTime, now: DateTime<Utc>) -> Self {
        Self {
            at,
            next_run: next_occurrence(at, now),
        }
    }

    pub fn at(&self) -> NaiveTime {
        self.at
    }

    pub fn next_run(&self) -> DateTime<Utc> {
        self.next_run
    }

    /// `true` once when the trigger is due; the next run then moves to the
    /// following day's trigger time after `now`.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        if now < self.next_run {
            return false;
        }
        self.next_run = next_occurrence(self.at, now);
        true
    }
}

/// Result of one scheduler check
#[derive(Debug)]
pub enum TickOutcome {
    /// Trigger not due
    Idle,
    Delivered(CycleOutcome),
    Failed(CycleError),
    /// The run panicked; the scheduler is unaffected
    Panicked,
}

/// Polls a [`DailyTrigger`] and runs the analysis cycle when it fires
pub struct Scheduler<T> {
    cycle: Arc<DailyAnalysis<T>>,
    trigger: DailyTrigger,
    runs: u64,
}

impl<T: MailTransport + 'static> Scheduler<T> {
    pub fn new(cycle: Arc<DailyAnalysis<T>>, trigger: DailyTrigger) -> Self {
        Self {
            cycle,
            trigger,
            runs: 0,
        }
    }

    pub fn trigger(&self) -> &DailyTrigger {
        &self.trigger
    }

    /// Number of runs started so far
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Check the trigger at `now` and, if due, run one cycle to completion.
    pub async fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if !self.trigger.poll(now) {
            return TickOutcome::Idle;
        }

        self.runs += 1;
        info!(
            run = self.runs,
            next_run = %self.trigger.next_run(),
            "[Scheduler] Trigger fired"
        );

        let cycle = Arc::clone(&self.cycle);
        let handle = tokio::spawn(async move { cycle.run(now).await });

        match handle.await {
            Ok(Ok(outcome)) => {
                info!(
                    run = self.runs,
                    recipients = outcome.recipients,
                    chars = outcome.chars,
                    "[Scheduler] Run complete"
                );
                TickOutcome::Delivered(outcome)
            }
            Ok(Err(e)) => {
                error!(run = self.runs, error = %e, "[Scheduler] Run failed, waiting for next trigger");
                TickOutcome::Failed(e)
            }
            Err(e) => {
                error!(run = self.runs, error = %e, "[Scheduler] Run panicked, waiting for next trigger");
                TickOutcome::Panicked
            }
        }
    }

    /// Check every `poll_every` until `cancel` fires.
    pub async fn run(mut self, clock: &dyn Clock, poll_every: Duration, cancel: CancellationToken) {
        info!(
            at = %self.trigger.at(),
            next_run = %self.trigger.next_run(),
            poll_secs = poll_every.as_secs(),
            "📅 Scheduler started - daily analysis at {} UTC",
            self.trigger.at().format("%H:%M")
        );

        let mut interval = tokio::time::interval(poll_every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("[Scheduler] Received shutdown signal after {} runs", self.runs);
                    return;
                }
                _ = interval.tick() => {
                    self.tick(clock.now()).await;
                }
            }
        }
    }
}
