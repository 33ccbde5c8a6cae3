//! Forecast matching and import-plan evaluation

pub mod matcher;
pub mod ports;

pub use matcher::{placeholder_key, ForecastMatcher};
pub use ports::MatchingService;
