//! # Tally Infra
//!
//! Infrastructure layer - adapters and runtime drivers.
//!
//! This crate contains:
//! - In-memory store adapters implementing the `tally-core` ports
//!   (reference semantics for the persistent collaborators)
//! - The tokio-driven job poller that drives the core watch state machine
//!   with real time
//! - Environment configuration loading
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Depends on `tally-domain` and `tally-core`
//! - All I/O and timing lives here; core stays pure

pub mod config;
pub mod observability;
pub mod scheduling;
pub mod stores;

pub use scheduling::{JobPoller, PollerError, PollerResult};
pub use stores::memory::{InMemoryBudgetStore, InMemoryCategoryStore};
