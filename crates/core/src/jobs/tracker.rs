//! Job tracker - async-task lifecycle as an explicit state machine
//!
//! The lifecycle is IDLE → SUBMITTED → (poll → {still-running | SUCCESS |
//! FAILURE})* → IDLE, with a client-side watchdog that stops watching
//! after a bounded ceiling. `JobWatch` is driven by a caller-owned
//! scheduler tick, so the whole machine can be tested by feeding
//! synthetic status sequences without real time; `tally-infra` supplies
//! the tokio-interval driver. The tracker holds no business data, only
//! status — on success the caller refetches whatever records the job
//! touched.

use std::sync::Arc;
use std::time::Duration;

use tally_domain::{EngineConfig, JobProgress, JobState, JobStatus, Result};
use tracing::{info, warn};

use super::ports::{JobStatusSource, SyncTrigger};

/// Which kind of remote job a watch is following; selects the poll
/// interval (hour syncs move slower than imports).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    HoursSync,
    Import,
}

/// One observed transition of a watched job.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchStep {
    /// Job still running; keep polling on the next tick
    Running(Option<JobProgress>),
    /// Remote reported success with its terminal payload
    Succeeded(JobStatus),
    /// Remote reported failure with a message
    Failed(String),
    /// Watchdog ceiling passed with no terminal state: outcome unknown,
    /// we stop watching (the remote job itself is not cancelled)
    TimedOut,
}

impl WatchStep {
    /// Terminal steps end the watch; `Running` keeps it alive.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running(_))
    }
}

/// Watch state for a single task id.
///
/// Exactly one watch may follow a given task id at a time; once a
/// terminal step is recorded the watch is finished and never advances
/// again, no matter what is fed to it.
#[derive(Debug, Clone)]
pub struct JobWatch {
    task_id: String,
    ceiling: Duration,
    waited: Duration,
    outcome: Option<WatchStep>,
}

impl JobWatch {
    /// Start watching a submitted task with the given watchdog ceiling.
    pub fn new(task_id: impl Into<String>, ceiling: Duration) -> Self {
        Self { task_id: task_id.into(), ceiling, waited: Duration::ZERO, outcome: None }
    }

    /// The task id this watch follows.
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// True once a terminal step was recorded; a finished watch never
    /// re-polls.
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// The recorded terminal step, if any.
    pub fn outcome(&self) -> Option<&WatchStep> {
        self.outcome.as_ref()
    }

    /// Feed one polled status into the watch.
    pub fn on_status(&mut self, status: &JobStatus) -> WatchStep {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let step = match status.state {
            JobState::Success => WatchStep::Succeeded(status.clone()),
            JobState::Failure => WatchStep::Failed(
                status.error.clone().unwrap_or_else(|| "job failed".to_string()),
            ),
            JobState::Pending | JobState::Progress => {
                WatchStep::Running(status.progress.clone())
            }
        };

        if step.is_terminal() {
            info!(task_id = %self.task_id, step = ?step, "Job reached terminal state");
            self.outcome = Some(step.clone());
        }
        step
    }

    /// A poll attempt failed (network hiccup). Transient by contract:
    /// never terminal, the watch keeps going until a terminal status or
    /// the watchdog.
    pub fn on_poll_error(&mut self, error: &tally_domain::TallyError) -> WatchStep {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        warn!(task_id = %self.task_id, error = %error, "Transient poll error; continuing");
        WatchStep::Running(None)
    }

    /// Advance the watch clock by one tick. Returns `Some(TimedOut)`
    /// exactly once, when the accumulated wait first passes the ceiling;
    /// `None` otherwise (including every call after the watch finished).
    pub fn on_tick(&mut self, elapsed: Duration) -> Option<WatchStep> {
        if self.is_finished() {
            return None;
        }
        self.waited += elapsed;
        if self.waited >= self.ceiling {
            warn!(
                task_id = %self.task_id,
                waited_secs = self.waited.as_secs(),
                "Watchdog ceiling passed; giving up on job (outcome unknown)"
            );
            self.outcome = Some(WatchStep::TimedOut);
            return Some(WatchStep::TimedOut);
        }
        None
    }
}

/// Generic tracker for remote long-running jobs.
///
/// Submission and polling delegate to collaborators; watch state lives in
/// per-task [`JobWatch`] values handed to callers.
pub struct JobTracker {
    trigger: Arc<dyn SyncTrigger>,
    status_source: Arc<dyn JobStatusSource>,
    config: EngineConfig,
}

impl JobTracker {
    /// Create a new job tracker.
    pub fn new(
        trigger: Arc<dyn SyncTrigger>,
        status_source: Arc<dyn JobStatusSource>,
        config: EngineConfig,
    ) -> Self {
        Self { trigger, status_source, config }
    }

    /// Submit a remote hours re-sync and return a watch for its task id.
    pub async fn submit_hours_sync(&self, project_key: &str) -> Result<JobWatch> {
        let task_id = self.trigger.start_hours_sync(project_key).await?;
        info!(project_key = %project_key, task_id = %task_id, "Hours sync submitted");
        Ok(JobWatch::new(task_id, self.config.job_watchdog_ceiling))
    }

    /// Begin watching an already-submitted task (e.g. an import job whose
    /// id came back from the commit call).
    pub fn watch(&self, task_id: impl Into<String>) -> JobWatch {
        JobWatch::new(task_id, self.config.job_watchdog_ceiling)
    }

    /// Poll the status source once for a task.
    pub async fn poll(&self, task_id: &str) -> Result<JobStatus> {
        self.status_source.get_status(task_id).await
    }

    /// Poll interval for a job kind.
    pub fn poll_interval(&self, kind: JobKind) -> Duration {
        match kind {
            JobKind::HoursSync => self.config.sync_poll_interval,
            JobKind::Import => self.config.import_poll_interval,
        }
    }
}
