//! Port interface for the category store

use std::collections::HashMap;

use async_trait::async_trait;
use tally_domain::{Category, Result};

/// Trait for the persistent category set and the global epic→category
/// mapping.
///
/// The mapping is keyed by `epic_key` alone (not project-scoped): an epic
/// key colliding across two tracked projects shares its category. Each
/// `set_mapping` write is the unit of consistency — concurrent writes to
/// the same key resolve last-write-wins, never merged.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// List the known categories with their display order
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// Get the full epic→category mapping
    async fn get_mappings(&self) -> Result<HashMap<String, String>>;

    /// Set (or overwrite) the mapping for one epic
    async fn set_mapping(&self, epic_key: &str, category: &str) -> Result<()>;

    /// Remove the mapping for one epic; removing an absent key is a no-op
    async fn delete_mapping(&self, epic_key: &str) -> Result<()>;

    /// Persist a new display order for all categories as one batch
    async fn reorder_categories(&self, ordered_names: &[String]) -> Result<()>;
}
