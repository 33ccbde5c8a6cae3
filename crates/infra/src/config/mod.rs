//! Engine configuration loading
//!
//! Overrides the domain defaults from environment variables.
//!
//! ## Environment Variables
//! - `TALLY_SYNC_POLL_INTERVAL_MS`: poll interval for hour-sync jobs
//! - `TALLY_IMPORT_POLL_INTERVAL_MS`: poll interval for import jobs
//! - `TALLY_JOB_WATCHDOG_SECS`: watchdog ceiling for any watched job
//!
//! Unset variables keep their defaults; a variable that is set but not a
//! valid number is a configuration error rather than silently ignored.

use std::time::Duration;

use tally_domain::{EngineConfig, Result, TallyError};
use tracing::info;

/// Load the engine configuration, applying `TALLY_*` overrides.
///
/// # Errors
/// Returns `TallyError::Config` when a set variable fails to parse.
pub fn load_engine_config() -> Result<EngineConfig> {
    let config = from_lookup(|name| std::env::var(name).ok())?;
    info!(
        sync_poll_ms = config.sync_poll_interval.as_millis() as u64,
        import_poll_ms = config.import_poll_interval.as_millis() as u64,
        watchdog_secs = config.job_watchdog_ceiling.as_secs(),
        "Engine configuration loaded"
    );
    Ok(config)
}

/// Build a config from any variable lookup; split out so tests can feed a
/// fixed map instead of touching the process environment.
pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<EngineConfig> {
    let mut config = EngineConfig::default();

    if let Some(ms) = parse_var(&lookup, "TALLY_SYNC_POLL_INTERVAL_MS")? {
        config.sync_poll_interval = Duration::from_millis(ms);
    }
    if let Some(ms) = parse_var(&lookup, "TALLY_IMPORT_POLL_INTERVAL_MS")? {
        config.import_poll_interval = Duration::from_millis(ms);
    }
    if let Some(secs) = parse_var(&lookup, "TALLY_JOB_WATCHDOG_SECS")? {
        config.job_watchdog_ceiling = Duration::from_secs(secs);
    }

    Ok(config)
}

fn parse_var(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<u64>> {
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|e| TallyError::Config(format!("{name}={raw}: {e}"))),
    }
}
