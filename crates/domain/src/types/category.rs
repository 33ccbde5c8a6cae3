//! Categories and display ordering

use serde::{Deserialize, Serialize};

/// User-defined grouping label for epics, globally ordered for display.
///
/// The name is the identity: the epic→category mapping stores names, and
/// the sentinel `UNCATEGORIZED` is never persisted as a real category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub display_order: i64,
}

/// A new ordinal position for one sibling record, sent as part of a full
/// reorder batch (categories, templates).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinalUpdate {
    pub id: String,
    pub display_order: i64,
}
