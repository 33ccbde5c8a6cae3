//! Port interface for ordered sibling collections

use async_trait::async_trait;
use tally_domain::{OrdinalUpdate, Result};

/// Trait for a store holding one ordered collection of sibling records
/// (categories, templates).
///
/// `persist_order` always receives the full sibling set in one batch so
/// the store never observes a partially-reordered collection.
#[async_trait]
pub trait ReorderStore: Send + Sync {
    /// Write new ordinal positions for every sibling as one batch
    async fn persist_order(&self, items: &[OrdinalUpdate]) -> Result<()>;

    /// The store's current order, for re-fetching after a failed write
    async fn authoritative_order(&self) -> Result<Vec<String>>;
}
