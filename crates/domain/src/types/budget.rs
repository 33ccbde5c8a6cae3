//! Epic budget records and aggregation output shapes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Planned-vs-actual hours for a single epic.
///
/// Identity is `(project_key, epic_key)`; `id` is the store's row handle.
/// `estimated_hours` is `None` until an estimate has been explicitly set —
/// an epic with logged hours but no estimate is "unbudgeted" and still
/// appears in roll-ups. `actuals_by_month` keys are `"YYYY-MM"`; a
/// `BTreeMap` keeps them chronologically sorted (lexicographic order on
/// the key format is chronological).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpicBudgetRecord {
    pub id: Uuid,
    pub project_key: String,
    pub epic_key: String,
    pub epic_summary: String,
    /// Category carried on the record itself; overridden by the global
    /// epic→category mapping when one exists.
    pub epic_category: Option<String>,
    pub estimated_hours: Option<f64>,
    pub actuals_by_month: BTreeMap<String, f64>,
}

impl EpicBudgetRecord {
    /// Sum of logged hours across all months. Missing months count as 0.
    pub fn total_actual(&self) -> f64 {
        self.actuals_by_month.values().sum()
    }

    /// Estimated hours, treating an unset estimate as 0 for arithmetic.
    pub fn estimated(&self) -> f64 {
        self.estimated_hours.unwrap_or(0.0)
    }

    /// Hours left against the estimate (negative when overrun).
    pub fn remaining(&self) -> f64 {
        self.estimated() - self.total_actual()
    }

    /// Completion percentage; exactly 0 for a zero/unset estimate, never
    /// NaN or infinite.
    pub fn pct_complete(&self) -> f64 {
        let estimated = self.estimated();
        if estimated > 0.0 {
            self.total_actual() / estimated * 100.0
        } else {
            0.0
        }
    }

    /// An epic is budgeted only when a positive estimate was explicitly set.
    pub fn is_budgeted(&self) -> bool {
        matches!(self.estimated_hours, Some(hours) if hours > 0.0)
    }

    /// Sort key within a category group: summary, falling back to the epic
    /// key when the summary is empty. Case-sensitive, deterministic.
    pub fn sort_key(&self) -> &str {
        if self.epic_summary.is_empty() {
            &self.epic_key
        } else {
            &self.epic_summary
        }
    }
}

/// One epic as it appears inside an aggregation result, with every derived
/// field materialized for the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpicRollup {
    pub epic_key: String,
    pub epic_summary: String,
    /// Effective category after applying the global mapping
    pub category: String,
    pub estimated_hours: f64,
    pub total_actual: f64,
    pub remaining: f64,
    pub pct_complete: f64,
    pub is_budgeted: bool,
    pub actuals_by_month: BTreeMap<String, f64>,
}

/// Element-wise hour sums for a category group or the whole project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetTotals {
    pub estimated_hours: f64,
    pub actual_hours: f64,
    pub remaining_hours: f64,
    /// actual/estimated * 100, 0 when the estimate sums to 0
    pub pct_complete: f64,
    pub actuals_by_month: BTreeMap<String, f64>,
}

/// One category's members plus their subtotal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: String,
    pub epics: Vec<EpicRollup>,
    pub subtotal: BudgetTotals,
}

/// Full aggregation output: ordered category groups, grand totals, and the
/// sorted union of month keys seen in any record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateResult {
    pub groups: Vec<CategoryGroup>,
    pub grand_total: BudgetTotals,
    pub all_months: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(estimate: Option<f64>, actuals: &[(&str, f64)]) -> EpicBudgetRecord {
        EpicBudgetRecord {
            id: Uuid::new_v4(),
            project_key: "DELIV".to_string(),
            epic_key: "DELIV-1".to_string(),
            epic_summary: "Checkout".to_string(),
            epic_category: None,
            estimated_hours: estimate,
            actuals_by_month: actuals.iter().map(|(m, h)| (m.to_string(), *h)).collect(),
        }
    }

    #[test]
    fn derived_fields_for_budgeted_epic() {
        let rec = record(Some(100.0), &[("2024-01", 50.0), ("2024-02", 25.0)]);
        assert_eq!(rec.total_actual(), 75.0);
        assert_eq!(rec.remaining(), 25.0);
        assert_eq!(rec.pct_complete(), 75.0);
        assert!(rec.is_budgeted());
    }

    #[test]
    fn zero_estimate_never_divides() {
        let rec = record(None, &[("2024-01", 12.0)]);
        assert_eq!(rec.pct_complete(), 0.0);
        assert!(!rec.is_budgeted());
        assert_eq!(rec.remaining(), -12.0);
    }

    #[test]
    fn explicit_zero_estimate_is_unbudgeted() {
        let rec = record(Some(0.0), &[]);
        assert!(!rec.is_budgeted());
        assert_eq!(rec.pct_complete(), 0.0);
    }

    #[test]
    fn sort_key_falls_back_to_epic_key() {
        let mut rec = record(Some(1.0), &[]);
        assert_eq!(rec.sort_key(), "Checkout");
        rec.epic_summary.clear();
        assert_eq!(rec.sort_key(), "DELIV-1");
    }
}
