//! In-memory store adapters
//!
//! Reference implementations of the persistent-store ports: integration
//! tests run against them, and they pin the store semantics the real
//! backends must honor (upsert identity, last-write-wins mapping writes,
//! full-batch reorder).

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tally_core::{BudgetStore, CategoryStore, ReorderStore};
use tally_domain::{Category, EpicBudgetRecord, OrdinalUpdate, Result, TallyError};
use tracing::debug;
use uuid::Uuid;

/// In-memory budget record store.
#[derive(Default)]
pub struct InMemoryBudgetStore {
    records: RwLock<Vec<EpicBudgetRecord>>,
}

impl InMemoryBudgetStore {
    /// Create a store pre-seeded with records.
    pub fn with_records(records: Vec<EpicBudgetRecord>) -> Self {
        Self { records: RwLock::new(records) }
    }
}

#[async_trait]
impl BudgetStore for InMemoryBudgetStore {
    async fn get_budgets(&self, project_key: &str) -> Result<Vec<EpicBudgetRecord>> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|r| r.project_key == project_key)
            .cloned()
            .collect())
    }

    async fn set_estimate(&self, id: Uuid, hours: f64) -> Result<()> {
        if hours < 0.0 || !hours.is_finite() {
            return Err(TallyError::InvalidInput(format!("bad estimate: {hours}")));
        }
        let mut records = self.records.write();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| TallyError::NotFound(format!("budget {id}")))?;
        record.estimated_hours = Some(hours);
        Ok(())
    }

    async fn delete_budget(&self, id: Uuid) -> Result<()> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(TallyError::NotFound(format!("budget {id}")));
        }
        Ok(())
    }

    async fn bulk_upsert(&self, project_key: &str, incoming: Vec<EpicBudgetRecord>) -> Result<()> {
        for record in &incoming {
            // Same estimate rules as set_estimate; the whole batch is
            // rejected before anything is written.
            if let Some(hours) = record.estimated_hours {
                if hours < 0.0 || !hours.is_finite() {
                    return Err(TallyError::InvalidInput(format!(
                        "bad estimate for {}: {hours}",
                        record.epic_key
                    )));
                }
            }
            for month in record.actuals_by_month.keys() {
                tally_domain::utils::parse_month_key(month)?;
            }
        }

        let mut records = self.records.write();
        for mut record in incoming {
            record.project_key = project_key.to_string();
            match records
                .iter_mut()
                .find(|r| r.project_key == project_key && r.epic_key == record.epic_key)
            {
                Some(existing) => {
                    // Upsert keeps the row id and the logged actuals; only
                    // the sync job writes actuals_by_month.
                    existing.epic_summary = record.epic_summary;
                    existing.epic_category = record.epic_category;
                    existing.estimated_hours = record.estimated_hours;
                }
                None => records.push(record),
            }
        }
        debug!(project_key = %project_key, total = records.len(), "Bulk upsert applied");
        Ok(())
    }
}

/// In-memory category set and epic→category mapping.
///
/// Mapping writes are last-write-wins per epic key; the mapping is global
/// (not project-scoped). Also serves as the [`ReorderStore`] for the
/// category collection.
#[derive(Default)]
pub struct InMemoryCategoryStore {
    categories: RwLock<Vec<Category>>,
    mappings: RwLock<HashMap<String, String>>,
}

impl InMemoryCategoryStore {
    /// Create a store with categories ordered as given.
    pub fn with_categories(names: &[&str]) -> Self {
        let categories = names
            .iter()
            .enumerate()
            .map(|(i, name)| Category { name: name.to_string(), display_order: i as i64 })
            .collect();
        Self { categories: RwLock::new(categories), mappings: RwLock::new(HashMap::new()) }
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        let mut categories = self.categories.read().clone();
        categories.sort_by_key(|c| c.display_order);
        Ok(categories)
    }

    async fn get_mappings(&self) -> Result<HashMap<String, String>> {
        Ok(self.mappings.read().clone())
    }

    async fn set_mapping(&self, epic_key: &str, category: &str) -> Result<()> {
        self.mappings.write().insert(epic_key.to_string(), category.to_string());
        Ok(())
    }

    async fn delete_mapping(&self, epic_key: &str) -> Result<()> {
        self.mappings.write().remove(epic_key);
        Ok(())
    }

    async fn reorder_categories(&self, ordered_names: &[String]) -> Result<()> {
        let items: Vec<OrdinalUpdate> = ordered_names
            .iter()
            .enumerate()
            .map(|(i, name)| OrdinalUpdate { id: name.clone(), display_order: i as i64 })
            .collect();
        self.persist_order(&items).await
    }
}

#[async_trait]
impl ReorderStore for InMemoryCategoryStore {
    async fn persist_order(&self, items: &[OrdinalUpdate]) -> Result<()> {
        let mut categories = self.categories.write();
        // Reject the whole batch before mutating anything: the store must
        // never observe a partially-reordered set.
        for item in items {
            if !categories.iter().any(|c| c.name == item.id) {
                return Err(TallyError::NotFound(format!("category {}", item.id)));
            }
        }
        for item in items {
            if let Some(category) = categories.iter_mut().find(|c| c.name == item.id) {
                category.display_order = item.display_order;
            }
        }
        Ok(())
    }

    async fn authoritative_order(&self) -> Result<Vec<String>> {
        let mut categories = self.categories.read().clone();
        categories.sort_by_key(|c| c.display_order);
        Ok(categories.into_iter().map(|c| c.name).collect())
    }
}
