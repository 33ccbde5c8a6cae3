//! Job poller - drives a core `JobWatch` with real tokio time
//!
//! The loop polls the status source on the job-kind interval, feeds the
//! watch, and stops on the first terminal step: remote success, remote
//! failure, the watchdog ceiling, or caller cancellation. Cancellation
//! and timeout stop the *watching* only; the remote job keeps running.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tally_core::{JobKind, JobTracker, WatchStep};
use tally_domain::{JobStatus, TallyError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::error::{PollerError, PollerResult};

/// Removes the task id from the active registry on scope exit, success
/// and error paths alike.
struct ActiveGuard {
    registry: Arc<Mutex<HashSet<String>>>,
    task_id: String,
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.task_id);
    }
}

/// Tokio driver for [`tally_core::JobWatch`].
///
/// At most one watch loop per task id: a second `watch` call for an id
/// that is still being followed fails with `AlreadyWatching`.
pub struct JobPoller {
    tracker: Arc<JobTracker>,
    active: Arc<Mutex<HashSet<String>>>,
}

impl JobPoller {
    /// Create a poller over a job tracker.
    pub fn new(tracker: Arc<JobTracker>) -> Self {
        Self { tracker, active: Arc::new(Mutex::new(HashSet::new())) }
    }

    /// Whether a watch loop is currently following this task id.
    pub fn is_watching(&self, task_id: &str) -> bool {
        self.active.lock().contains(task_id)
    }

    /// Poll a task until it reaches a terminal state.
    ///
    /// Returns the terminal `JobStatus` on remote success. Transient poll
    /// errors keep the loop alive; only a terminal status, the watchdog,
    /// or `cancel` end it. The caller is responsible for refetching
    /// whatever records the job affected after success.
    ///
    /// # Errors
    /// `AlreadyWatching` when another loop follows the same task id;
    /// `Cancelled` on caller cancellation; `Job(JobFailed)` /
    /// `Job(JobTimeout)` for the terminal failure modes.
    #[instrument(skip(self, cancel), fields(task_id = %task_id))]
    pub async fn watch(
        &self,
        task_id: &str,
        kind: JobKind,
        cancel: CancellationToken,
    ) -> PollerResult<JobStatus> {
        {
            let mut active = self.active.lock();
            if !active.insert(task_id.to_string()) {
                return Err(PollerError::AlreadyWatching(task_id.to_string()));
            }
        }
        let _guard =
            ActiveGuard { registry: Arc::clone(&self.active), task_id: task_id.to_string() };

        let interval = self.tracker.poll_interval(kind);
        let mut watch = self.tracker.watch(task_id);
        info!(interval_ms = interval.as_millis() as u64, "Watch loop started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Watch loop cancelled");
                    return Err(PollerError::Cancelled(task_id.to_string()));
                }
                _ = tokio::time::sleep(interval) => {
                    if let Some(WatchStep::TimedOut) = watch.on_tick(interval) {
                        return Err(PollerError::Job(TallyError::JobTimeout(format!(
                            "task {task_id}: no terminal state within the watchdog ceiling"
                        ))));
                    }

                    let step = match self.tracker.poll(task_id).await {
                        Ok(status) => watch.on_status(&status),
                        Err(err) => watch.on_poll_error(&err),
                    };

                    match step {
                        WatchStep::Succeeded(status) => {
                            info!("Watch loop finished: remote success");
                            return Ok(status);
                        }
                        WatchStep::Failed(message) => {
                            return Err(PollerError::Job(TallyError::JobFailed(message)));
                        }
                        WatchStep::TimedOut => {
                            return Err(PollerError::Job(TallyError::JobTimeout(format!(
                                "task {task_id}: no terminal state within the watchdog ceiling"
                            ))));
                        }
                        WatchStep::Running(_) => {}
                    }
                }
            }
        }
    }
}
