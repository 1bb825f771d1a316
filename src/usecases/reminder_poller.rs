//! Reminder poller: fetch due reminders on a fixed period and fan them out to the trigger.
//!
//! The repeating task is owned through a [`PollerHandle`]; nothing runs before
//! `start` and nothing is dispatched after `stop`.

use crate::domain::DomainError;
use crate::ports::ReminderSource;
use crate::shared::config::MAX_POLL_INTERVAL_SECS;
use crate::usecases::notification_trigger::{NotificationTrigger, TriggerOutcome};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Shortest accepted poll period.
pub const MIN_PERIOD: Duration = Duration::from_secs(1);
/// Longest accepted poll period; larger values overflow the timer.
pub const MAX_PERIOD: Duration = Duration::from_secs(MAX_POLL_INTERVAL_SECS);

pub struct ReminderPoller {
    source: Arc<dyn ReminderSource>,
    trigger: Arc<NotificationTrigger>,
    period: Duration,
    /// Report triggered reminders as taken to the server.
    acknowledge: bool,
}

impl ReminderPoller {
    pub fn new(
        source: Arc<dyn ReminderSource>,
        trigger: Arc<NotificationTrigger>,
        period: Duration,
    ) -> Self {
        Self {
            source,
            trigger,
            period: clamp_period(period),
            acknowledge: false,
        }
    }

    pub fn with_acknowledge(mut self, acknowledge: bool) -> Self {
        self.acknowledge = acknowledge;
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// One poll: fetch, then trigger every reminder in response order.
    /// Returns how many reminders the server reported.
    pub async fn poll_once(&self) -> Result<usize, DomainError> {
        let reminders = self.source.fetch_due().await?;
        let count = reminders.len();
        if count > 0 {
            info!(count, "due reminders received");
        }

        for reminder in &reminders {
            let outcome = self.trigger.trigger(&reminder.name, reminder.dosage_text()).await;
            if !self.acknowledge || outcome != TriggerOutcome::Shown {
                continue;
            }
            if let Some(id) = reminder.id {
                if let Err(e) = self.source.mark_taken(id).await {
                    warn!(medicine_id = id, error = %e, "failed to mark reminder as taken");
                }
            }
        }

        Ok(count)
    }

    /// Spawn the repeating task. The first poll happens one full period after start.
    ///
    /// Every tick runs its poll on its own task, so a slow response never delays
    /// the next dispatch; overlapping polls are allowed and complete in any order.
    /// Missed ticks are skipped, not caught up.
    pub fn start(self) -> PollerHandle {
        let poller = Arc::new(self);
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let ticks = Arc::new(AtomicU64::new(0));
        let tick_counter = Arc::clone(&ticks);
        let period = poller.period;

        let task = tokio::spawn(async move {
            let Some(first) = Instant::now().checked_add(period) else {
                warn!(
                    period_secs = period.as_secs(),
                    "poll period overflows the clock; poller not started"
                );
                return;
            };
            let mut ticker = tokio::time::interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(period_secs = period.as_secs(), "reminder poller started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let tick = tick_counter.fetch_add(1, Ordering::SeqCst) + 1;
                        let poller = Arc::clone(&poller);
                        tokio::spawn(async move {
                            match poller.poll_once().await {
                                Ok(count) => debug!(tick, count, "poll complete"),
                                Err(e) => warn!(tick, error = %e, "poll failed; waiting for next tick"),
                            }
                        });
                    }
                    // Fires on stop() and when the handle is dropped.
                    _ = stop_rx.changed() => break,
                }
            }

            info!("reminder poller stopped");
        });

        PollerHandle {
            stop_tx,
            task,
            ticks,
        }
    }
}

fn clamp_period(period: Duration) -> Duration {
    let clamped = period.clamp(MIN_PERIOD, MAX_PERIOD);
    if clamped != period {
        warn!(
            requested_secs = period.as_secs(),
            used_secs = clamped.as_secs(),
            "poll period out of range; clamped"
        );
    }
    clamped
}

/// Handle to a running poller. Dropping it stops the timer as well.
pub struct PollerHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
    ticks: Arc<AtomicU64>,
}

impl PollerHandle {
    /// Number of ticks dispatched so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the timer and wait for the loop to exit. Polls already in flight
    /// are left to finish on their own.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.task.await {
            warn!(error = %e, "poller task ended abnormally");
        }
    }
}
