//! Port interface for the persistent budget store

use async_trait::async_trait;
use tally_domain::{EpicBudgetRecord, Result};
use uuid::Uuid;

/// Trait for reading and mutating epic budget records.
///
/// `actuals_by_month` is mutated only by the external hours-sync job,
/// never through this port; estimates move through `set_estimate` and
/// `bulk_upsert` (forecast import).
#[async_trait]
pub trait BudgetStore: Send + Sync {
    /// Get all budget records for a project
    async fn get_budgets(&self, project_key: &str) -> Result<Vec<EpicBudgetRecord>>;

    /// Set the planned-hours estimate on a record
    async fn set_estimate(&self, id: Uuid, hours: f64) -> Result<()>;

    /// Delete a budget record (explicit user delete only)
    async fn delete_budget(&self, id: Uuid) -> Result<()>;

    /// Insert or update records in bulk, keyed by `(project_key, epic_key)`
    async fn bulk_upsert(&self, project_key: &str, records: Vec<EpicBudgetRecord>) -> Result<()>;
}
