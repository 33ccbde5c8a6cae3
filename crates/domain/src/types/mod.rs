//! Domain types and models

pub mod budget;
pub mod category;
pub mod forecast;
pub mod jobs;

// Re-export the commonly used shapes for convenience
pub use budget::{AggregateResult, BudgetTotals, CategoryGroup, EpicBudgetRecord, EpicRollup};
pub use category::{Category, OrdinalUpdate};
pub use forecast::{
    ConfidenceBand, EpicMappingProposal, EstimateUpdate, ForecastLineItem, ImportPlan,
    ImportPreview, ImportResult, MatchedEpic, PlaceholderCreate,
};
pub use jobs::{JobProgress, JobState, JobStatus};
