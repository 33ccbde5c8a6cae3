//! Budget aggregation and the budget-store port

pub mod aggregator;
pub mod ports;

pub use aggregator::aggregate;
pub use ports::BudgetStore;
