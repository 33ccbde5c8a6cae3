//! Port interface for the categorization/matching collaborator

use async_trait::async_trait;
use tally_domain::{ForecastLineItem, ImportPlan, ImportPreview, ImportResult, Result};

/// Trait for the external service that proposes forecast→epic matches
/// with confidence scores and persists committed import plans.
///
/// Match quality is entirely the collaborator's concern (it is a swapped-in
/// estimate provider); the engine only post-processes its proposals.
#[async_trait]
pub trait MatchingService: Send + Sync {
    /// Ask the collaborator for a raw mapping proposal for an import
    /// session
    async fn preview_import(
        &self,
        project_key: &str,
        forecast_items: &[ForecastLineItem],
    ) -> Result<ImportPreview>;

    /// Persist a committed import plan. Must be idempotent per epic key:
    /// re-running an identical plan updates in place rather than
    /// duplicating.
    async fn commit_import(&self, project_key: &str, plan: &ImportPlan) -> Result<ImportResult>;
}
