//! Budget aggregation - pure roll-up computation
//!
//! Turns a flat list of epic budget records into per-category subtotals,
//! grand totals, and per-epic derived fields. No I/O; callers fetch the
//! records, the mapping snapshot, and the known category list first, then
//! re-run this after any mutation (there is no push-based invalidation).

use std::collections::{BTreeSet, HashMap};

use tally_domain::constants::UNCATEGORIZED;
use tally_domain::{
    AggregateResult, BudgetTotals, Category, CategoryGroup, EpicBudgetRecord, EpicRollup,
};

/// Aggregate records into ordered category groups with subtotals.
///
/// Effective category per record: the global mapping wins, then the
/// record's own category, then "Uncategorized". Group order:
/// "Uncategorized" first when non-empty, then known categories by
/// `display_order`, then categories present in the data but missing from
/// the known list (a retired category may still be referenced) in
/// first-seen order. Members sort by summary (falling back to epic key),
/// case-sensitive ascending, with the epic key as tie-breaker so equal
/// summaries stay deterministic.
pub fn aggregate(
    records: &[EpicBudgetRecord],
    mappings: &HashMap<String, String>,
    categories: &[Category],
) -> AggregateResult {
    // Bucket record indices by effective category, remembering first-seen
    // order for categories the known list doesn't cover.
    let mut buckets: HashMap<String, Vec<&EpicBudgetRecord>> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for record in records {
        let category = effective_category(record, mappings);
        if !buckets.contains_key(&category) {
            first_seen.push(category.clone());
        }
        buckets.entry(category).or_default().push(record);
    }

    // Output category order: sentinel, known (by display_order), unknown.
    let mut known = categories.to_vec();
    known.sort_by_key(|c| c.display_order);

    let mut ordered: Vec<String> = Vec::new();
    if buckets.contains_key(UNCATEGORIZED) {
        ordered.push(UNCATEGORIZED.to_string());
    }
    for category in &known {
        if category.name != UNCATEGORIZED && buckets.contains_key(&category.name) {
            ordered.push(category.name.clone());
        }
    }
    for name in &first_seen {
        if name != UNCATEGORIZED && !known.iter().any(|c| &c.name == name) {
            ordered.push(name.clone());
        }
    }

    let mut grand_total = BudgetTotals::default();
    let mut all_months: BTreeSet<String> = BTreeSet::new();
    let mut groups: Vec<CategoryGroup> = Vec::with_capacity(ordered.len());

    for name in ordered {
        let mut members = match buckets.remove(&name) {
            Some(members) => members,
            None => continue,
        };
        members.sort_by(|a, b| {
            a.sort_key().cmp(b.sort_key()).then_with(|| a.epic_key.cmp(&b.epic_key))
        });

        let mut subtotal = BudgetTotals::default();
        let epics: Vec<EpicRollup> = members
            .into_iter()
            .map(|record| {
                all_months.extend(record.actuals_by_month.keys().cloned());
                let rollup = rollup(record, &name);
                absorb(&mut subtotal, &rollup);
                absorb(&mut grand_total, &rollup);
                rollup
            })
            .collect();

        finalize(&mut subtotal);
        groups.push(CategoryGroup { category: name, epics, subtotal });
    }

    finalize(&mut grand_total);

    AggregateResult { groups, grand_total, all_months: all_months.into_iter().collect() }
}

/// Mapping wins over the record's own category; absence of both means
/// "Uncategorized".
fn effective_category(record: &EpicBudgetRecord, mappings: &HashMap<String, String>) -> String {
    mappings
        .get(&record.epic_key)
        .cloned()
        .or_else(|| record.epic_category.clone())
        .unwrap_or_else(|| UNCATEGORIZED.to_string())
}

fn rollup(record: &EpicBudgetRecord, category: &str) -> EpicRollup {
    EpicRollup {
        epic_key: record.epic_key.clone(),
        epic_summary: record.epic_summary.clone(),
        category: category.to_string(),
        estimated_hours: record.estimated(),
        total_actual: record.total_actual(),
        remaining: record.remaining(),
        pct_complete: record.pct_complete(),
        is_budgeted: record.is_budgeted(),
        actuals_by_month: record.actuals_by_month.clone(),
    }
}

fn absorb(totals: &mut BudgetTotals, rollup: &EpicRollup) {
    totals.estimated_hours += rollup.estimated_hours;
    totals.actual_hours += rollup.total_actual;
    totals.remaining_hours += rollup.remaining;
    for (month, hours) in &rollup.actuals_by_month {
        *totals.actuals_by_month.entry(month.clone()).or_insert(0.0) += hours;
    }
}

/// Percent is derived last, guarded against a zero estimate sum.
fn finalize(totals: &mut BudgetTotals) {
    totals.pct_complete = if totals.estimated_hours > 0.0 {
        totals.actual_hours / totals.estimated_hours * 100.0
    } else {
        0.0
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn record(
        key: &str,
        summary: &str,
        category: Option<&str>,
        estimate: Option<f64>,
        actuals: &[(&str, f64)],
    ) -> EpicBudgetRecord {
        EpicBudgetRecord {
            id: Uuid::new_v4(),
            project_key: "DELIV".to_string(),
            epic_key: key.to_string(),
            epic_summary: summary.to_string(),
            epic_category: category.map(str::to_string),
            estimated_hours: estimate,
            actuals_by_month: actuals.iter().map(|(m, h)| (m.to_string(), *h)).collect(),
        }
    }

    fn categories(names: &[&str]) -> Vec<Category> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Category { name: name.to_string(), display_order: i as i64 })
            .collect()
    }

    #[test]
    fn empty_input_yields_zeroed_totals() {
        let result = aggregate(&[], &HashMap::new(), &categories(&["Design"]));
        assert!(result.groups.is_empty());
        assert!(result.all_months.is_empty());
        assert_eq!(result.grand_total.estimated_hours, 0.0);
        assert_eq!(result.grand_total.pct_complete, 0.0);
    }

    #[test]
    fn single_uncategorized_record_subtotal() {
        // est 100, 50h logged in 2024-01
        let records = vec![record("A", "", None, Some(100.0), &[("2024-01", 50.0)])];
        let result = aggregate(&records, &HashMap::new(), &[]);

        assert_eq!(result.groups.len(), 1);
        let group = &result.groups[0];
        assert_eq!(group.category, UNCATEGORIZED);
        assert_eq!(group.subtotal.estimated_hours, 100.0);
        assert_eq!(group.subtotal.actual_hours, 50.0);
        assert_eq!(group.subtotal.remaining_hours, 50.0);
        assert_eq!(group.subtotal.pct_complete, 50.0);
    }

    #[test]
    fn mapping_overrides_record_category() {
        let records = vec![record("A", "Cart", Some("Build"), Some(10.0), &[])];
        let mut mappings = HashMap::new();
        mappings.insert("A".to_string(), "Design".to_string());

        let result = aggregate(&records, &mappings, &categories(&["Build", "Design"]));
        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].category, "Design");
        assert_eq!(result.groups[0].epics[0].category, "Design");
    }

    #[test]
    fn category_order_is_sentinel_known_then_unknown() {
        let records = vec![
            record("A", "a", Some("Retired"), Some(1.0), &[]),
            record("B", "b", Some("Design"), Some(1.0), &[]),
            record("C", "c", None, Some(1.0), &[]),
            record("D", "d", Some("Build"), Some(1.0), &[]),
        ];
        // Build sorts before Design via display_order
        let result = aggregate(&records, &HashMap::new(), &categories(&["Build", "Design"]));

        let order: Vec<&str> = result.groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(order, vec![UNCATEGORIZED, "Build", "Design", "Retired"]);
    }

    #[test]
    fn members_sorted_by_summary_then_key() {
        let records = vec![
            record("P-3", "beta", None, Some(1.0), &[]),
            record("P-1", "", None, Some(1.0), &[]),
            record("P-2", "Alpha", None, Some(1.0), &[]),
        ];
        let result = aggregate(&records, &HashMap::new(), &[]);

        let keys: Vec<&str> =
            result.groups[0].epics.iter().map(|e| e.epic_key.as_str()).collect();
        // Case-sensitive ascending: "Alpha" < "P-1" (summary fallback) < "beta"
        assert_eq!(keys, vec!["P-2", "P-1", "P-3"]);
    }

    #[test]
    fn grand_total_invariant_holds() {
        let records = vec![
            record("A", "a", Some("Build"), Some(40.0), &[("2024-01", 10.0)]),
            record("B", "b", Some("Design"), None, &[("2024-02", 7.5)]),
            record("C", "c", None, Some(12.5), &[("2024-01", 5.0), ("2024-03", 2.5)]),
        ];
        let result = aggregate(&records, &HashMap::new(), &categories(&["Build", "Design"]));

        let est: f64 = records.iter().map(EpicBudgetRecord::estimated).sum();
        let actual: f64 = records.iter().map(EpicBudgetRecord::total_actual).sum();
        let sub_est: f64 = result.groups.iter().map(|g| g.subtotal.estimated_hours).sum();
        let sub_actual: f64 = result.groups.iter().map(|g| g.subtotal.actual_hours).sum();

        assert_eq!(result.grand_total.estimated_hours, est);
        assert_eq!(result.grand_total.actual_hours, actual);
        assert_eq!(sub_est, est);
        assert_eq!(sub_actual, actual);
        assert_eq!(
            result.grand_total.remaining_hours,
            result.grand_total.estimated_hours - result.grand_total.actual_hours
        );
    }

    #[test]
    fn per_month_subtotals_sum_members() {
        let records = vec![
            record("A", "a", None, Some(1.0), &[("2024-01", 4.0), ("2024-02", 1.0)]),
            record("B", "b", None, Some(1.0), &[("2024-01", 6.0)]),
        ];
        let result = aggregate(&records, &HashMap::new(), &[]);

        let subtotal = &result.groups[0].subtotal;
        assert_eq!(subtotal.actuals_by_month.get("2024-01"), Some(&10.0));
        assert_eq!(subtotal.actuals_by_month.get("2024-02"), Some(&1.0));
        assert_eq!(result.all_months, vec!["2024-01".to_string(), "2024-02".to_string()]);
    }

    #[test]
    fn unbudgeted_epic_still_appears() {
        let records = vec![record("A", "a", None, None, &[("2024-01", 3.0)])];
        let result = aggregate(&records, &HashMap::new(), &[]);

        let epic = &result.groups[0].epics[0];
        assert!(!epic.is_budgeted);
        assert_eq!(epic.total_actual, 3.0);
        assert_eq!(epic.pct_complete, 0.0);
    }

    #[test]
    fn aggregation_is_order_independent() {
        let mut records = vec![
            record("A", "a", Some("Build"), Some(40.0), &[("2024-01", 10.0)]),
            record("B", "b", Some("Design"), Some(20.0), &[("2024-02", 5.0)]),
            record("C", "c", None, Some(10.0), &[]),
        ];
        let known = categories(&["Build", "Design"]);

        let forward = aggregate(&records, &HashMap::new(), &known);
        records.reverse();
        let backward = aggregate(&records, &HashMap::new(), &known);

        let fwd = serde_json::to_value(&forward).unwrap();
        let bwd = serde_json::to_value(&backward).unwrap();
        assert_eq!(fwd, bwd);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let records = vec![record("A", "a", None, Some(5.0), &[("2024-04", 2.0)])];
        let first = aggregate(&records, &HashMap::new(), &[]);
        let second = aggregate(&records, &HashMap::new(), &[]);
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }
}
