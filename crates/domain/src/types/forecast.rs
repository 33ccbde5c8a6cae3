//! Forecast-import shapes: line items, match proposals, commit plans

use serde::{Deserialize, Serialize};

use crate::constants::{HIGH_CONFIDENCE_MIN, MEDIUM_CONFIDENCE_MIN};

/// One externally forecasted work item, read-only within the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastLineItem {
    /// Forecast-assigned epic name (not yet tied to any real epic)
    pub epic: String,
    pub total_hours: f64,
    pub reasoning: String,
}

/// A real epic proposed as a match for a forecast item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedEpic {
    pub epic_key: String,
    pub epic_summary: String,
    /// Match strength from the categorization collaborator, in [0, 1]
    pub confidence: f32,
    /// Suggested hour split; editable by the user before commit
    pub allocated_hours: f64,
    pub category: Option<String>,
    pub reasoning: String,
}

/// Proposed mapping for one forecast line item. `matched_epics` may be
/// empty (the item is then "unmapped"). The sum of allocated hours should
/// approximate `forecast_hours` but is advisory only; user edits may break
/// it and commit is still allowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpicMappingProposal {
    pub forecast_epic: String,
    pub forecast_hours: f64,
    pub matched_epics: Vec<MatchedEpic>,
}

/// Raw proposal for an import session as returned by the matching
/// collaborator, before user edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPreview {
    pub mappings: Vec<EpicMappingProposal>,
    /// Forecast items with zero matches
    pub unmapped: Vec<ForecastLineItem>,
    /// Matched real epics that already carry an estimate and would be
    /// overwritten by a commit
    pub will_skip: usize,
    pub categories: Vec<super::Category>,
}

/// Estimate update for one existing epic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateUpdate {
    pub epic_key: String,
    pub estimated_hours: f64,
    pub category: Option<String>,
}

/// Placeholder epic to be created for an unmatched forecast item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderCreate {
    /// Synthesized key, deterministic per forecast epic name
    pub epic_key: String,
    pub estimated_hours: f64,
    pub source_forecast_epic: String,
}

/// Final commit payload for an import session.
///
/// `total_hours_to_import` is shown on the confirmation screen only; it is
/// never validated against the original forecast total, since user
/// overrides are intentional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportPlan {
    pub updates: Vec<EstimateUpdate>,
    pub creates: Vec<PlaceholderCreate>,
    pub total_hours_to_import: f64,
}

/// Outcome of a committed import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportResult {
    pub updated: usize,
    pub created: usize,
}

/// Presentational confidence band for a match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    /// Band boundaries: `> 0.8` high, `(0.6, 0.8]` medium, else low.
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence > HIGH_CONFIDENCE_MIN {
            Self::High
        } else if confidence > MEDIUM_CONFIDENCE_MIN {
            Self::Medium
        } else {
            Self::Low
        }
    }
}
