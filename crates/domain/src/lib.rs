//! # Tally Domain
//!
//! Business domain types and models for Tally.
//!
//! This crate contains:
//! - Domain data types (EpicBudgetRecord, Category, forecast shapes, etc.)
//! - Domain error types and Result definitions
//! - Engine configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Tally crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
