//! Category assignment and the category-store port

pub mod ports;
pub mod service;

pub use ports::CategoryStore;
pub use service::{BulkAssignOutcome, CategoryAssignment};
