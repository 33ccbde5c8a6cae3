//! Runtime drivers for the core job watch state machine

pub mod error;
pub mod job_poller;

pub use error::{PollerError, PollerResult};
pub use job_poller::JobPoller;
