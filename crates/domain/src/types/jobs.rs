//! Async job status shapes reported by the job-status collaborator

use serde::{Deserialize, Serialize};

/// Remote job state as reported by the status source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Pending,
    Progress,
    Success,
    Failure,
}

impl JobState {
    /// Success and failure are terminal; pending/progress keep the poll
    /// loop alive.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }
}

/// Progress detail attached to a running job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProgress {
    pub current: u64,
    pub total: u64,
    pub percent: f64,
    pub message: Option<String>,
}

/// One poll's view of a remote job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub state: JobState,
    pub progress: Option<JobProgress>,
    /// Terminal payload on success
    pub result: Option<serde_json::Value>,
    /// Terminal message on failure
    pub error: Option<String>,
}

impl JobStatus {
    /// Convenience constructor for a non-terminal status.
    pub fn running(progress: Option<JobProgress>) -> Self {
        Self { state: JobState::Progress, progress, result: None, error: None }
    }

    /// Convenience constructor for a successful terminal status.
    pub fn success(result: serde_json::Value) -> Self {
        Self { state: JobState::Success, progress: None, result: Some(result), error: None }
    }

    /// Convenience constructor for a failed terminal status.
    pub fn failure(error: impl Into<String>) -> Self {
        Self { state: JobState::Failure, progress: None, result: None, error: Some(error.into()) }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}
