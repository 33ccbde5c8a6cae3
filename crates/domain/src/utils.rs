//! Small domain utilities

use chrono::NaiveDate;

use crate::{Result, TallyError};

/// Validate a `"YYYY-MM"` month key.
///
/// Actuals buckets are keyed by calendar month; the format also makes
/// lexicographic order chronological, which the aggregator relies on.
///
/// # Errors
/// Returns `InvalidInput` for anything that is not a real year-month.
pub fn parse_month_key(key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{key}-01"), "%Y-%m-%d")
        .map_err(|_| TallyError::InvalidInput(format!("bad month key: {key:?}")))
}
