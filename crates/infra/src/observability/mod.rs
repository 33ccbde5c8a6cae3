//! Tracing subscriber setup and logging helpers

use once_cell::sync::OnceCell;
use tally_domain::TallyError;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: OnceCell<()> = OnceCell::new();

/// Install the global tracing subscriber.
///
/// Filter comes from `RUST_LOG`, defaulting to `info`. Safe to call more
/// than once; only the first call installs anything.
pub fn init_tracing() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = fmt().with_env_filter(filter).with_target(true).try_init();
    });
}

/// Convert a `TallyError` into a stable label suitable for logging and
/// dashboards.
#[inline]
pub fn error_label(error: &TallyError) -> &'static str {
    match error {
        TallyError::UnknownCategory(_) => "unknown_category",
        TallyError::InvalidInput(_) => "invalid_input",
        TallyError::Store(_) => "store",
        TallyError::NotFound(_) => "not_found",
        TallyError::JobFailed(_) => "job_failed",
        TallyError::JobTimeout(_) => "job_timeout",
        TallyError::Config(_) => "config",
        TallyError::Internal(_) => "internal",
    }
}
