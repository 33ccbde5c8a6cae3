//! Port interfaces for long-running job collaborators

use async_trait::async_trait;
use tally_domain::{JobStatus, Result};

/// Trait for kicking off a remote hours re-sync from the time-tracking
/// source. The returned task id is opaque and source-assigned.
#[async_trait]
pub trait SyncTrigger: Send + Sync {
    /// Start re-syncing actual hours for a project; returns the task id
    async fn start_hours_sync(&self, project_key: &str) -> Result<String>;
}

/// Trait for reading the status of a remote job.
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    /// Get the current status of a task
    async fn get_status(&self, task_id: &str) -> Result<JobStatus>;
}
