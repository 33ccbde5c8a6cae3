//! Forecast matcher - maps an external forecast onto a project's real epics
//!
//! One import session is: fetch a proposal from the matching collaborator,
//! let the user edit hour splits and placeholder choices, evaluate the
//! edits into a commit plan, commit. Evaluation is pure; only the proposal
//! fetch and the commit touch collaborators.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tally_domain::constants::PLACEHOLDER_KEY_PREFIX;
use tally_domain::{
    EpicBudgetRecord, EpicMappingProposal, EstimateUpdate, ForecastLineItem, ImportPlan,
    ImportPreview, ImportResult, PlaceholderCreate, Result, TallyError,
};
use tracing::{debug, info};

use super::ports::MatchingService;

/// Synthesize a deterministic placeholder epic key from a forecast epic
/// name: `"Loyalty Program"` → `"PH-LOYALTY-PROGRAM"`. Determinism makes
/// re-committing an identical plan update in place instead of creating a
/// second placeholder. A name with no alphanumeric characters yields the
/// bare prefix; [`ForecastMatcher::evaluate_commit`] rejects that rather
/// than minting an unnamed key.
pub fn placeholder_key(forecast_epic: &str) -> String {
    let mut slug = String::with_capacity(forecast_epic.len());
    let mut last_dash = true;
    for ch in forecast_epic.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_uppercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    let slug = slug.trim_end_matches('-');
    format!("{PLACEHOLDER_KEY_PREFIX}{slug}")
}

/// Forecast matching service for import sessions.
pub struct ForecastMatcher {
    matching: Arc<dyn MatchingService>,
}

impl ForecastMatcher {
    /// Create a new forecast matcher.
    pub fn new(matching: Arc<dyn MatchingService>) -> Self {
        Self { matching }
    }

    /// Fetch the raw mapping proposal for an import session.
    ///
    /// The collaborator owns match quality; this function accepts its
    /// proposal as-is and recomputes `will_skip` — the number of distinct
    /// matched real epics that already carry a positive estimate and
    /// should not be silently overwritten — from the live records.
    pub async fn propose_mapping(
        &self,
        project_key: &str,
        forecast_items: &[ForecastLineItem],
        records: &[EpicBudgetRecord],
    ) -> Result<ImportPreview> {
        let mut preview = self.matching.preview_import(project_key, forecast_items).await?;

        let budgeted: HashSet<&str> = records
            .iter()
            .filter(|r| r.is_budgeted())
            .map(|r| r.epic_key.as_str())
            .collect();

        let matched: HashSet<&str> = preview
            .mappings
            .iter()
            .flat_map(|m| m.matched_epics.iter())
            .map(|m| m.epic_key.as_str())
            .collect();

        preview.will_skip = matched.intersection(&budgeted).count();

        debug!(
            project_key = %project_key,
            mappings = preview.mappings.len(),
            unmapped = preview.unmapped.len(),
            will_skip = preview.will_skip,
            "Forecast mapping proposed"
        );
        Ok(preview)
    }

    /// Evaluate user-edited proposals into a commit plan. Pure; no
    /// collaborator calls.
    ///
    /// Every matched epic with `allocated_hours > 0` becomes an update
    /// (category carried through when present); duplicate epic keys
    /// collapse to the last occurrence. Every forecast item the user opted
    /// into becomes a placeholder create sized at its forecast total.
    /// `total_hours_to_import` is display-only — the plan is never
    /// rejected for disagreeing with the original forecast total, since
    /// user overrides are intentional.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a negative allocated-hours edit, before
    /// anything else is computed; also for an opted-in forecast epic whose
    /// name yields no slug characters, or two opted-in names that slug to
    /// the same placeholder key (committing both would collapse them into
    /// one upsert and silently drop one item's hours).
    pub fn evaluate_commit(
        &self,
        proposals: &[EpicMappingProposal],
        placeholder_choices: &HashMap<String, bool>,
        forecast_items: &[ForecastLineItem],
    ) -> Result<ImportPlan> {
        for matched in proposals.iter().flat_map(|p| p.matched_epics.iter()) {
            if matched.allocated_hours < 0.0 {
                return Err(TallyError::InvalidInput(format!(
                    "negative allocated hours for {}: {}",
                    matched.epic_key, matched.allocated_hours
                )));
            }
        }

        // Last occurrence wins per epic key so an identical re-run stays
        // an in-place update.
        let mut update_index: HashMap<String, usize> = HashMap::new();
        let mut updates: Vec<EstimateUpdate> = Vec::new();
        for proposal in proposals {
            for matched in &proposal.matched_epics {
                if matched.allocated_hours <= 0.0 {
                    continue;
                }
                let update = EstimateUpdate {
                    epic_key: matched.epic_key.clone(),
                    estimated_hours: matched.allocated_hours,
                    category: matched.category.clone(),
                };
                match update_index.get(&matched.epic_key) {
                    Some(&idx) => updates[idx] = update,
                    None => {
                        update_index.insert(matched.epic_key.clone(), updates.len());
                        updates.push(update);
                    }
                }
            }
        }

        // Synthesized keys must be unique within one plan: the store
        // upserts per epic key, so a collision would collapse two creates
        // into one and lose the other item's hours.
        let mut create_sources: HashMap<String, &str> = HashMap::new();
        let mut creates: Vec<PlaceholderCreate> = Vec::new();
        for item in forecast_items {
            if !placeholder_choices.get(&item.epic).copied().unwrap_or(false) {
                continue;
            }
            let epic_key = placeholder_key(&item.epic);
            if epic_key == PLACEHOLDER_KEY_PREFIX {
                return Err(TallyError::InvalidInput(format!(
                    "cannot derive a placeholder key from {:?}",
                    item.epic
                )));
            }
            if let Some(previous) = create_sources.insert(epic_key.clone(), item.epic.as_str()) {
                return Err(TallyError::InvalidInput(format!(
                    "placeholder key {epic_key} collides for {previous:?} and {:?}",
                    item.epic
                )));
            }
            creates.push(PlaceholderCreate {
                epic_key,
                estimated_hours: item.total_hours,
                source_forecast_epic: item.epic.clone(),
            });
        }

        let total_hours_to_import = updates.iter().map(|u| u.estimated_hours).sum::<f64>()
            + creates.iter().map(|c| c.estimated_hours).sum::<f64>();

        Ok(ImportPlan { updates, creates, total_hours_to_import })
    }

    /// Commit a plan through the matching collaborator.
    pub async fn commit(&self, project_key: &str, plan: &ImportPlan) -> Result<ImportResult> {
        let result = self.matching.commit_import(project_key, plan).await?;
        info!(
            project_key = %project_key,
            updated = result.updated,
            created = result.created,
            "Forecast import committed"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tally_domain::MatchedEpic;
    use uuid::Uuid;

    use super::*;

    struct MockMatchingService {
        preview: ImportPreview,
        committed: Mutex<Vec<ImportPlan>>,
    }

    impl MockMatchingService {
        fn new(preview: ImportPreview) -> Self {
            Self { preview, committed: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl MatchingService for MockMatchingService {
        async fn preview_import(
            &self,
            _project_key: &str,
            _forecast_items: &[ForecastLineItem],
        ) -> Result<ImportPreview> {
            Ok(self.preview.clone())
        }

        async fn commit_import(
            &self,
            _project_key: &str,
            plan: &ImportPlan,
        ) -> Result<ImportResult> {
            self.committed.lock().unwrap().push(plan.clone());
            Ok(ImportResult { updated: plan.updates.len(), created: plan.creates.len() })
        }
    }

    fn forecast_item(epic: &str, hours: f64) -> ForecastLineItem {
        ForecastLineItem {
            epic: epic.to_string(),
            total_hours: hours,
            reasoning: "forecast model output".to_string(),
        }
    }

    fn matched(key: &str, confidence: f32, allocated: f64) -> MatchedEpic {
        MatchedEpic {
            epic_key: key.to_string(),
            epic_summary: format!("{key} summary"),
            confidence,
            allocated_hours: allocated,
            category: None,
            reasoning: "name similarity".to_string(),
        }
    }

    fn record(key: &str, estimate: Option<f64>) -> EpicBudgetRecord {
        EpicBudgetRecord {
            id: Uuid::new_v4(),
            project_key: "PROJ".to_string(),
            epic_key: key.to_string(),
            epic_summary: key.to_string(),
            epic_category: None,
            estimated_hours: estimate,
            actuals_by_month: Default::default(),
        }
    }

    fn proposal(forecast_epic: &str, hours: f64, matches: Vec<MatchedEpic>) -> EpicMappingProposal {
        EpicMappingProposal {
            forecast_epic: forecast_epic.to_string(),
            forecast_hours: hours,
            matched_epics: matches,
        }
    }

    fn matcher_with(preview: ImportPreview) -> (ForecastMatcher, Arc<MockMatchingService>) {
        let service = Arc::new(MockMatchingService::new(preview));
        (ForecastMatcher::new(Arc::clone(&service) as Arc<dyn MatchingService>), service)
    }

    fn empty_preview() -> ImportPreview {
        ImportPreview { mappings: vec![], unmapped: vec![], will_skip: 0, categories: vec![] }
    }

    #[test]
    fn placeholder_keys_are_deterministic_slugs() {
        assert_eq!(placeholder_key("Loyalty Program"), "PH-LOYALTY-PROGRAM");
        assert_eq!(placeholder_key("Cart & Checkout!"), "PH-CART-CHECKOUT");
        assert_eq!(placeholder_key("Loyalty Program"), placeholder_key("Loyalty Program"));
    }

    #[tokio::test]
    async fn will_skip_counts_already_budgeted_matches() {
        let preview = ImportPreview {
            mappings: vec![
                proposal("Cart", 40.0, vec![matched("PROJ-5", 0.9, 40.0)]),
                proposal("Search", 30.0, vec![matched("PROJ-7", 0.7, 30.0)]),
            ],
            unmapped: vec![],
            will_skip: 0,
            categories: vec![],
        };
        let (matcher, _) = matcher_with(preview);

        // PROJ-5 already budgeted, PROJ-7 not
        let records = vec![record("PROJ-5", Some(25.0)), record("PROJ-7", None)];
        let items = vec![forecast_item("Cart", 40.0), forecast_item("Search", 30.0)];

        let result = matcher.propose_mapping("PROJ", &items, &records).await.unwrap();
        assert_eq!(result.will_skip, 1);
    }

    #[test]
    fn single_match_evaluates_to_one_update() {
        // "Cart" (40h) matched to PROJ-5 at 0.9
        let (matcher, _) = matcher_with(empty_preview());
        let proposals = vec![proposal("Cart", 40.0, vec![matched("PROJ-5", 0.9, 40.0)])];
        let items = vec![forecast_item("Cart", 40.0)];

        let plan = matcher.evaluate_commit(&proposals, &HashMap::new(), &items).unwrap();

        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].epic_key, "PROJ-5");
        assert_eq!(plan.updates[0].estimated_hours, 40.0);
        assert!(plan.creates.is_empty());
        assert_eq!(plan.total_hours_to_import, 40.0);
    }

    #[test]
    fn placeholder_choice_becomes_create() {
        let (matcher, _) = matcher_with(empty_preview());
        let items = vec![forecast_item("Loyalty Program", 20.0)];
        let choices = HashMap::from([("Loyalty Program".to_string(), true)]);

        let plan = matcher.evaluate_commit(&[], &choices, &items).unwrap();

        assert!(plan.updates.is_empty());
        assert_eq!(
            plan.creates,
            vec![PlaceholderCreate {
                epic_key: "PH-LOYALTY-PROGRAM".to_string(),
                estimated_hours: 20.0,
                source_forecast_epic: "Loyalty Program".to_string(),
            }]
        );
        assert_eq!(plan.total_hours_to_import, 20.0);
    }

    #[test]
    fn declined_placeholder_is_skipped() {
        let (matcher, _) = matcher_with(empty_preview());
        let items = vec![forecast_item("Loyalty Program", 20.0)];
        let choices = HashMap::from([("Loyalty Program".to_string(), false)]);

        let plan = matcher.evaluate_commit(&[], &choices, &items).unwrap();
        assert!(plan.creates.is_empty());
        assert_eq!(plan.total_hours_to_import, 0.0);
    }

    #[test]
    fn zero_allocation_is_excluded() {
        let (matcher, _) = matcher_with(empty_preview());
        let proposals = vec![proposal(
            "Cart",
            40.0,
            vec![matched("PROJ-5", 0.9, 0.0), matched("PROJ-6", 0.4, 15.0)],
        )];

        let plan = matcher.evaluate_commit(&proposals, &HashMap::new(), &[]).unwrap();
        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].epic_key, "PROJ-6");
    }

    #[test]
    fn duplicate_epic_keys_collapse_to_last_edit() {
        let (matcher, _) = matcher_with(empty_preview());
        let proposals = vec![
            proposal("Cart", 40.0, vec![matched("PROJ-5", 0.9, 40.0)]),
            proposal("Checkout", 10.0, vec![matched("PROJ-5", 0.5, 12.0)]),
        ];

        let plan = matcher.evaluate_commit(&proposals, &HashMap::new(), &[]).unwrap();
        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].estimated_hours, 12.0);
        assert_eq!(plan.total_hours_to_import, 12.0);
    }

    #[test]
    fn colliding_placeholder_slugs_are_rejected() {
        // "Cart!" and "Cart?" both slug to PH-CART; committing both would
        // upsert the same key twice and drop one item's hours
        let (matcher, _) = matcher_with(empty_preview());
        let items = vec![forecast_item("Cart!", 10.0), forecast_item("Cart?", 20.0)];
        let choices =
            HashMap::from([("Cart!".to_string(), true), ("Cart?".to_string(), true)]);

        let err = matcher.evaluate_commit(&[], &choices, &items).unwrap_err();
        assert!(matches!(
            err,
            TallyError::InvalidInput(msg) if msg.contains("Cart!") && msg.contains("Cart?")
        ));
    }

    #[test]
    fn all_symbol_name_yields_no_placeholder_key() {
        let (matcher, _) = matcher_with(empty_preview());
        let items = vec![forecast_item("???", 5.0)];
        let choices = HashMap::from([("???".to_string(), true)]);

        let err = matcher.evaluate_commit(&[], &choices, &items).unwrap_err();
        assert!(matches!(err, TallyError::InvalidInput(_)));
    }

    #[test]
    fn allocation_mismatch_still_commits() {
        // User bumped the split well past the forecast total; no rejection
        let (matcher, _) = matcher_with(empty_preview());
        let proposals = vec![proposal("Cart", 40.0, vec![matched("PROJ-5", 0.9, 95.0)])];

        let plan = matcher.evaluate_commit(&proposals, &HashMap::new(), &[]).unwrap();
        assert_eq!(plan.updates[0].estimated_hours, 95.0);
        assert_eq!(plan.total_hours_to_import, 95.0);
    }

    #[test]
    fn negative_hours_rejected_as_validation_error() {
        let (matcher, _) = matcher_with(empty_preview());
        let proposals = vec![proposal("Cart", 40.0, vec![matched("PROJ-5", 0.9, -3.0)])];

        let err = matcher.evaluate_commit(&proposals, &HashMap::new(), &[]).unwrap_err();
        assert!(matches!(err, TallyError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn commit_delegates_to_collaborator() {
        let (matcher, service) = matcher_with(empty_preview());
        let plan = ImportPlan {
            updates: vec![EstimateUpdate {
                epic_key: "PROJ-5".to_string(),
                estimated_hours: 40.0,
                category: Some("Build".to_string()),
            }],
            creates: vec![],
            total_hours_to_import: 40.0,
        };

        let result = matcher.commit("PROJ", &plan).await.unwrap();
        assert_eq!(result.updated, 1);
        assert_eq!(result.created, 0);
        assert_eq!(service.committed.lock().unwrap().len(), 1);
    }
}
