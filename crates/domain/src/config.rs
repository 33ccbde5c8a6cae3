//! Engine configuration structures

use std::time::Duration;

use crate::constants::{IMPORT_POLL_INTERVAL_MS, JOB_WATCHDOG_SECS, SYNC_POLL_INTERVAL_MS};

/// Configuration for the reconciliation engine's async job handling.
///
/// Poll intervals differ per job kind (hour-sync jobs are slower-moving
/// than import jobs); the watchdog ceiling is shared. Defaults come from
/// `constants`; `tally-infra` overrides them from `TALLY_*` environment
/// variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Interval between status polls for hour-sync jobs
    pub sync_poll_interval: Duration,
    /// Interval between status polls for forecast-import jobs
    pub import_poll_interval: Duration,
    /// Client-side ceiling after which polling stops with a timeout.
    /// The remote job is not cancelled; we simply stop waiting.
    pub job_watchdog_ceiling: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sync_poll_interval: Duration::from_millis(SYNC_POLL_INTERVAL_MS),
            import_poll_interval: Duration::from_millis(IMPORT_POLL_INTERVAL_MS),
            job_watchdog_ceiling: Duration::from_secs(JOB_WATCHDOG_SECS),
        }
    }
}
