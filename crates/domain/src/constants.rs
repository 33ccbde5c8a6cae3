//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

/// Sentinel category for epics with no mapping and no record-level category.
/// Never persisted as a real category; always sorts first in roll-ups.
pub const UNCATEGORIZED: &str = "Uncategorized";

// Job polling configuration
pub const SYNC_POLL_INTERVAL_MS: u64 = 2_000;
pub const IMPORT_POLL_INTERVAL_MS: u64 = 1_500;
pub const JOB_WATCHDOG_SECS: u64 = 600; // 10 minutes

// Confidence display bands (exclusive lower bounds)
pub const HIGH_CONFIDENCE_MIN: f32 = 0.8;
pub const MEDIUM_CONFIDENCE_MIN: f32 = 0.6;

/// Prefix for synthesized placeholder epic keys
pub const PLACEHOLDER_KEY_PREFIX: &str = "PH-";
