//! Status event entities: the append-only review log

use crate::identity::{EventId, Timestamp};
use crate::phase::Phase;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity key identifying one trackable asset variant.
///
/// Several status events share a key (one per write); the pivot view folds
/// them down to one row per key. `Ord` derives field order
/// (project, root, asset, relation), which gives the deterministic terminal
/// tie-break used by ranking.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AssetKey {
    /// Production/show the asset belongs to.
    pub project: String,
    /// Root category within the project (characters, props, sets, ...).
    pub root: String,
    /// Asset name.
    pub asset: String,
    /// Relation or take variant of the asset.
    pub relation: String,
}

impl AssetKey {
    pub fn new(
        project: impl Into<String>,
        root: impl Into<String>,
        asset: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        AssetKey {
            project: project.into(),
            root: root.into(),
            asset: asset.into(),
            relation: relation.into(),
        }
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.project, self.root, self.asset, self.relation
        )
    }
}

/// One row of the append-only status log.
///
/// Events are immutable once written; corrections append a newer event for
/// the same (key, phase) and retractions flip `deleted`. The current status
/// of a (key, phase) partition is the non-deleted event with the greatest
/// `(modified_at, event_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StatusEvent {
    #[cfg_attr(feature = "openapi", schema(value_type = uuid::Uuid))]
    pub event_id: EventId,
    #[serde(flatten)]
    pub key: AssetKey,
    pub phase: Phase,
    /// Work-progress status vocabulary (e.g. "wip", "done"). Free-form;
    /// owned by the writing service.
    pub work_status: Option<String>,
    /// Approval status vocabulary (e.g. "approved", "retake"). Free-form;
    /// owned by the writing service.
    pub approval_status: Option<String>,
    /// Timestamp of the write. Non-decreasing per writer; equal stamps are
    /// disambiguated by `event_id`.
    #[cfg_attr(feature = "openapi", schema(value_type = chrono::DateTime<chrono::Utc>))]
    pub modified_at: Timestamp,
    /// Soft-delete flag. Deleted events are invisible to the pivot view.
    pub deleted: bool,
}

impl StatusEvent {
    /// Tie-break rank of this event inside its partition.
    pub fn recency(&self) -> (Timestamp, EventId) {
        (self.modified_at, self.event_id)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::new_event_id;
    use chrono::{TimeZone, Utc};

    fn make_test_event(asset: &str, modified_at: Timestamp) -> StatusEvent {
        StatusEvent {
            event_id: new_event_id(),
            key: AssetKey::new("alpha", "chr", asset, "main"),
            phase: Phase::Model,
            work_status: Some("wip".to_string()),
            approval_status: None,
            modified_at,
            deleted: false,
        }
    }

    #[test]
    fn test_asset_key_ord_is_field_order() {
        let a = AssetKey::new("alpha", "chr", "fred", "main");
        let b = AssetKey::new("alpha", "chr", "fred", "prox");
        let c = AssetKey::new("alpha", "prp", "anvil", "main");
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_asset_key_display() {
        let key = AssetKey::new("alpha", "chr", "fred", "main");
        assert_eq!(key.to_string(), "alpha/chr/fred/main");
    }

    #[test]
    fn test_recency_orders_by_timestamp_then_id() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let older = make_test_event("fred", t0);
        let newer = make_test_event("fred", t1);
        assert!(older.recency() < newer.recency());

        // Equal stamps fall back to the id, and UUIDv7 ids are
        // creation-ordered.
        let first = make_test_event("fred", t0);
        let second = make_test_event("fred", t0);
        assert!(first.recency() < second.recency());
    }

    #[test]
    fn test_event_serde_flattens_key() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let event = make_test_event("fred", t0);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["project"], "alpha");
        assert_eq!(value["asset"], "fred");
        assert_eq!(value["phase"], "mdl");
        assert!(value.get("key").is_none());
    }
}
