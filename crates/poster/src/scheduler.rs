//! Calendar-driven trigger for the poster.
//!
//! [`PostingScheduler::start`] spawns a loop that sleeps until the next fire
//! time of its [`PostingSchedule`] and then runs [`Poster::post_next`] on a
//! separate task. The returned [`SchedulerHandle`] owns the loop; dropping
//! it without calling [`SchedulerHandle::stop`] leaves the loop running.

use std::sync::Arc;
use std::time::Duration;

use fantrax_core::clock::{Clock, SystemClock};
use fantrax_core::schedule::PostingSchedule;
use fantrax_core::types::Timestamp;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::poster::{PostOutcome, Poster};

/// Longest single sleep. Long waits are split so a wall-clock jump (host
/// suspend, NTP step) only delays the recomputation by this much.
const MAX_SLEEP: Duration = Duration::from_secs(15 * 60);

/// How long [`SchedulerHandle::stop`] waits for an in-flight post.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub struct PostingScheduler {
    poster: Arc<Poster>,
    schedule: PostingSchedule,
    clock: Arc<dyn Clock>,
}

impl PostingScheduler {
    pub fn new(poster: Arc<Poster>, schedule: PostingSchedule) -> Self {
        Self {
            poster,
            schedule,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Spawn the scheduling loop.
    pub fn start(self) -> SchedulerHandle {
        let cancel = CancellationToken::new();
        let tracker = TaskTracker::new();

        tracing::info!(schedule = %self.schedule, "Posting scheduler started");

        let task = tokio::spawn(self.run(cancel.clone(), tracker.clone()));

        SchedulerHandle {
            cancel,
            tracker,
            task,
        }
    }

    async fn run(self, cancel: CancellationToken, tracker: TaskTracker) {
        let mut last_fire: Option<Timestamp> = None;

        loop {
            let now = self.clock.now();
            // Never fire the same slot twice, even if the clock runs behind
            // the timer.
            let reference = last_fire.map_or(now, |fired| fired.max(now));
            let next = self.schedule.next_after(reference);
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);

            if wait > MAX_SLEEP {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(MAX_SLEEP) => continue,
                }
            }

            tracing::debug!(next_post_at = %next, "Waiting for next posting slot");

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(wait) => {
                    last_fire = Some(next);
                    let poster = Arc::clone(&self.poster);
                    tracker.spawn(async move {
                        tracing::info!(scheduled_for = %next, "Scheduled post triggered");
                        log_outcome(&poster.post_next().await);
                    });
                }
            }
        }

        tracing::info!("Posting scheduler cancelled");
    }
}

fn log_outcome(outcome: &PostOutcome) {
    match outcome {
        PostOutcome::Posted { post_number, .. } => {
            tracing::debug!(post_number, "Scheduled post completed");
        }
        PostOutcome::Skipped(reason) => {
            tracing::debug!(%reason, "Scheduled post skipped");
        }
        // Already logged at error level by the poster.
        PostOutcome::Failed(_) => {}
    }
}

/// Owner of a running scheduler loop.
pub struct SchedulerHandle {
    cancel: CancellationToken,
    tracker: TaskTracker,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop scheduling and wait up to [`SHUTDOWN_GRACE`] for a post that is
    /// already running.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Posting scheduler task failed");
        }

        self.tracker.close();
        if tokio::time::timeout(SHUTDOWN_GRACE, self.tracker.wait())
            .await
            .is_err()
        {
            tracing::warn!("In-flight post did not finish before shutdown");
        }
        tracing::info!("Posting scheduler stopped");
    }
}
