//! Reorder service - persists drag-reorder results atomically

use std::collections::HashSet;
use std::sync::Arc;

use tally_domain::{OrdinalUpdate, Result, TallyError};
use tracing::debug;

use super::ports::ReorderStore;

/// Persists a new ordinal position for a set of sibling records as one
/// atomic batch.
///
/// The caller computes the batch from the dropped index permutation and
/// includes every affected sibling, not a delta. Reordering is the
/// optimistic half of a two-phase operation: on failure the caller
/// re-fetches [`ReorderService::authoritative_order`] instead of trusting
/// its local state.
pub struct ReorderService {
    store: Arc<dyn ReorderStore>,
}

impl ReorderService {
    /// Create a new reorder service.
    pub fn new(store: Arc<dyn ReorderStore>) -> Self {
        Self { store }
    }

    /// Persist a full reorder batch.
    ///
    /// # Errors
    /// Returns `InvalidInput` before any store call when ids repeat or the
    /// ordinals are not the contiguous permutation `0..n`.
    pub async fn reorder(&self, items: &[OrdinalUpdate]) -> Result<()> {
        if items.is_empty() {
            debug!("Empty reorder batch; nothing to persist");
            return Ok(());
        }

        let ids: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
        if ids.len() != items.len() {
            return Err(TallyError::InvalidInput(
                "reorder batch contains duplicate ids".to_string(),
            ));
        }

        let mut ordinals: Vec<i64> = items.iter().map(|i| i.display_order).collect();
        ordinals.sort_unstable();
        let contiguous = ordinals.iter().enumerate().all(|(i, &ord)| ord == i as i64);
        if !contiguous {
            return Err(TallyError::InvalidInput(
                "reorder batch ordinals must be the permutation 0..n".to_string(),
            ));
        }

        self.store.persist_order(items).await
    }

    /// Re-fetch the store's current order after a failed write.
    pub async fn authoritative_order(&self) -> Result<Vec<String>> {
        self.store.authoritative_order().await
    }
}
