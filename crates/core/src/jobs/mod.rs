//! Async job lifecycle: submit, poll, watchdog

pub mod ports;
pub mod tracker;

pub use ports::{JobStatusSource, SyncTrigger};
pub use tracker::{JobKind, JobTracker, JobWatch, WatchStep};
