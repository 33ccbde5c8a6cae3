//! Poller error types

use tally_domain::TallyError;
use thiserror::Error;

/// Errors surfaced by the job poller.
#[derive(Debug, Error)]
pub enum PollerError {
    /// A poller is already watching this task id; never run two loops
    /// against the same task
    #[error("already watching task {0}")]
    AlreadyWatching(String),

    /// The caller cancelled the watch before a terminal state
    #[error("watch cancelled for task {0}")]
    Cancelled(String),

    /// Terminal failure from the watch: `JobFailed` (remote reported
    /// failure) or `JobTimeout` (watchdog gave up, outcome unknown)
    #[error(transparent)]
    Job(#[from] TallyError),
}

/// Result type for poller operations
pub type PollerResult<T> = std::result::Result<T, PollerError>;
