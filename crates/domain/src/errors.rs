//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Tally
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TallyError {
    /// Category name is not in the known category set
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Input rejected before any collaborator call (bad name, negative hours)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Store or collaborator unreachable / returned an error
    #[error("Store error: {0}")]
    Store(String),

    /// Entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Remote job reported failure with a message
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Watchdog gave up waiting; the remote outcome is unknown
    #[error("Job timed out: {0}")]
    JobTimeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TallyError {
    /// Build a `Store` error carrying the failing operation and id context.
    pub fn store(operation: &str, detail: impl std::fmt::Display) -> Self {
        Self::Store(format!("{operation}: {detail}"))
    }
}

/// Result type alias for Tally operations
pub type Result<T> = std::result::Result<T, TallyError>;
