//! Category assignment service - core business logic

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tally_domain::constants::UNCATEGORIZED;
use tally_domain::{Result, TallyError};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::ports::CategoryStore;

/// Outcome of a bulk assignment. Every key is attempted independently;
/// prior successes are never rolled back, so both sides are always
/// enumerated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkAssignOutcome {
    pub succeeded: BTreeSet<String>,
    pub failed: BTreeMap<String, String>,
}

impl BulkAssignOutcome {
    /// True when at least one key failed while at least one succeeded.
    pub fn is_partial(&self) -> bool {
        !self.succeeded.is_empty() && !self.failed.is_empty()
    }
}

/// Applies categories to epics and maintains a cached snapshot of the
/// global epic→category mapping.
///
/// The cache has one invalidation rule: it is re-fetched from the store
/// after every mutation. Callers feed the snapshot into the aggregator
/// and re-aggregate after any change; there is no push-based
/// invalidation.
pub struct CategoryAssignment {
    store: Arc<dyn CategoryStore>,
    mappings: RwLock<HashMap<String, String>>,
}

impl CategoryAssignment {
    /// Create a new assignment service with an empty mapping cache.
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store, mappings: RwLock::new(HashMap::new()) }
    }

    /// Snapshot of the cached epic→category mapping.
    pub async fn mappings(&self) -> HashMap<String, String> {
        self.mappings.read().await.clone()
    }

    /// Re-fetch the mapping cache from the store.
    pub async fn refresh(&self) -> Result<()> {
        let fresh = self.store.get_mappings().await?;
        *self.mappings.write().await = fresh;
        Ok(())
    }

    /// Set or clear the category for one epic.
    ///
    /// An empty string (or the "Uncategorized" sentinel, which is never
    /// persisted) removes the mapping so the record's own category — or
    /// the sentinel — takes effect again. Removing an absent mapping is a
    /// no-op. A non-empty name must exist in the known category set.
    ///
    /// # Errors
    /// Returns `UnknownCategory` before any store write when the name is
    /// not a known category.
    pub async fn set_category(&self, epic_key: &str, category: &str) -> Result<()> {
        self.apply(epic_key, category).await?;
        self.refresh().await
    }

    /// Assign one category to many epics, one store write per key.
    ///
    /// Partial completion is expected and surfaced, never hidden: a
    /// failing key does not roll back keys already written. The cache is
    /// refreshed once at the end; callers re-aggregate afterward.
    pub async fn bulk_assign(&self, epic_keys: &[String], category: &str) -> BulkAssignOutcome {
        let mut outcome = BulkAssignOutcome::default();

        for epic_key in epic_keys {
            match self.apply(epic_key, category).await {
                Ok(()) => {
                    outcome.succeeded.insert(epic_key.clone());
                }
                Err(err) => {
                    warn!(epic_key = %epic_key, error = %err, "Bulk assign item failed");
                    outcome.failed.insert(epic_key.clone(), err.to_string());
                }
            }
        }

        if let Err(err) = self.refresh().await {
            warn!(error = %err, "Failed to refresh mapping cache after bulk assign");
        }

        debug!(
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "Bulk assign completed"
        );
        outcome
    }

    /// Validate and write one mapping without touching the cache.
    async fn apply(&self, epic_key: &str, category: &str) -> Result<()> {
        if category.is_empty() || category == UNCATEGORIZED {
            return self.store.delete_mapping(epic_key).await;
        }

        let known = self.store.list_categories().await?;
        if !known.iter().any(|c| c.name == category) {
            return Err(TallyError::UnknownCategory(category.to_string()));
        }

        self.store.set_mapping(epic_key, category).await
    }
}
