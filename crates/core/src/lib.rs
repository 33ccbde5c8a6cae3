//! # Tally Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The budget aggregation computation
//! - Category assignment, forecast matching, job tracking, and reorder
//!   services
//! - Port/adapter interfaces (traits) for every collaborator
//!
//! ## Architecture Principles
//! - Only depends on `tally-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod budget;
pub mod category;
pub mod forecast;
pub mod jobs;
pub mod ordering;

// Re-export specific items to avoid ambiguity
pub use budget::aggregator::aggregate;
pub use budget::ports::BudgetStore;
pub use category::ports::CategoryStore;
pub use category::{BulkAssignOutcome, CategoryAssignment};
pub use forecast::ports::MatchingService;
pub use forecast::ForecastMatcher;
pub use jobs::ports::{JobStatusSource, SyncTrigger};
pub use jobs::{JobKind, JobTracker, JobWatch, WatchStep};
pub use ordering::ports::ReorderStore;
pub use ordering::ReorderService;
