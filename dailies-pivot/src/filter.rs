//! Status filter evaluation over a scope snapshot.
//!
//! Decides which entities a pivot query matches. The same candidate list
//! feeds the total count and the ranked page, so this is the only place
//! match semantics live.

use crate::latest::{EntityPhases, ScopeSnapshot};
use dailies_core::{AssetKey, Phase, PivotQuery, StatusEvent};

/// The row a status filter inspects for one entity.
///
/// With a preferred phase the filter looks only at that phase's latest row:
/// an entity with no event there cannot match a non-empty status filter.
/// Without one it looks at the entity-wide latest.
pub(crate) fn evaluated_row<'a>(
    entity: &'a EntityPhases,
    preferred_phase: Option<Phase>,
) -> Option<&'a StatusEvent> {
    match preferred_phase {
        Some(phase) => entity.phase_latest(phase),
        None => entity.overall_latest(),
    }
}

fn name_matches(asset: &str, name_filter: Option<&str>) -> bool {
    match name_filter.map(|n| n.trim().to_lowercase()) {
        Some(needle) if !needle.is_empty() => asset.to_lowercase().contains(&needle),
        _ => true,
    }
}

/// Every entity in the snapshot that matches the query's name and status
/// filters, in key order. `len()` of the result is the query's total.
pub(crate) fn matching_entities(snapshot: &ScopeSnapshot, query: &PivotQuery) -> Vec<AssetKey> {
    snapshot
        .iter()
        .filter(|(key, entity)| {
            if !name_matches(&key.asset, query.name_filter.as_deref()) {
                return false;
            }
            if query.status_filter.matches_all() {
                return true;
            }
            match evaluated_row(entity, query.preferred_phase) {
                Some(row) => query
                    .status_filter
                    .matches(row.work_status.as_deref(), row.approval_status.as_deref()),
                None => false,
            }
        })
        .map(|(key, _)| key.clone())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dailies_core::{new_event_id, StatusFilter, Timestamp};

    fn ts(day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn make_test_event(
        asset: &str,
        phase: Phase,
        work: Option<&str>,
        approval: Option<&str>,
        modified_at: Timestamp,
    ) -> StatusEvent {
        StatusEvent {
            event_id: new_event_id(),
            key: AssetKey::new("alpha", "chr", asset, "main"),
            phase,
            work_status: work.map(str::to_string),
            approval_status: approval.map(str::to_string),
            modified_at,
            deleted: false,
        }
    }

    fn assets(keys: &[AssetKey]) -> Vec<&str> {
        keys.iter().map(|k| k.asset.as_str()).collect()
    }

    #[test]
    fn test_empty_filters_match_whole_scope() {
        let events = vec![
            make_test_event("fred", Phase::Model, Some("wip"), None, ts(1)),
            make_test_event("gary", Phase::Rig, None, None, ts(2)),
        ];
        let snapshot = ScopeSnapshot::build(&events);
        let query = PivotQuery::for_project("alpha");
        let matched = matching_entities(&snapshot, &query);
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn test_overall_latest_decides_without_preferred_phase() {
        // fred: mdl approved (old), rig retake (newer). The entity-wide
        // latest is the rig row, so filtering on "approved" misses fred.
        let events = vec![
            make_test_event("fred", Phase::Model, None, Some("approved"), ts(1)),
            make_test_event("fred", Phase::Rig, None, Some("retake"), ts(5)),
            make_test_event("gary", Phase::Model, None, Some("approved"), ts(2)),
        ];
        let snapshot = ScopeSnapshot::build(&events);
        let mut query = PivotQuery::for_project("alpha");
        query.status_filter = StatusFilter::new(["approved"], Vec::<String>::new());
        let matched = matching_entities(&snapshot, &query);
        assert_eq!(assets(&matched), vec!["gary"]);
    }

    #[test]
    fn test_preferred_phase_scopes_the_evaluated_row() {
        // Same data; scoping the filter to mdl finds fred's approval again.
        let events = vec![
            make_test_event("fred", Phase::Model, None, Some("approved"), ts(1)),
            make_test_event("fred", Phase::Rig, None, Some("retake"), ts(5)),
            make_test_event("gary", Phase::Model, None, Some("approved"), ts(2)),
        ];
        let snapshot = ScopeSnapshot::build(&events);
        let mut query = PivotQuery::for_project("alpha");
        query.preferred_phase = Some(Phase::Model);
        query.status_filter = StatusFilter::new(["approved"], Vec::<String>::new());
        let matched = matching_entities(&snapshot, &query);
        assert_eq!(assets(&matched), vec!["fred", "gary"]);
    }

    #[test]
    fn test_missing_preferred_phase_cannot_match_nonempty_filter() {
        let events = vec![
            make_test_event("fred", Phase::Rig, Some("wip"), None, ts(1)),
        ];
        let snapshot = ScopeSnapshot::build(&events);
        let mut query = PivotQuery::for_project("alpha");
        query.preferred_phase = Some(Phase::Model);
        query.status_filter = StatusFilter::new(Vec::<String>::new(), ["wip"]);
        assert!(matching_entities(&snapshot, &query).is_empty());

        // With no status constraint the entity is still in scope.
        query.status_filter = StatusFilter::default();
        assert_eq!(matching_entities(&snapshot, &query).len(), 1);
    }

    #[test]
    fn test_or_across_families() {
        let events = vec![
            make_test_event("fred", Phase::Model, Some("wip"), Some("retake"), ts(1)),
            make_test_event("gary", Phase::Model, Some("done"), Some("approved"), ts(1)),
            make_test_event("hank", Phase::Model, Some("done"), Some("retake"), ts(1)),
        ];
        let snapshot = ScopeSnapshot::build(&events);
        let mut query = PivotQuery::for_project("alpha");
        // "wip" catches fred via work, "approved" catches gary via
        // approval; hank matches neither list.
        query.status_filter = StatusFilter::new(["approved"], ["wip"]);
        let matched = matching_entities(&snapshot, &query);
        assert_eq!(assets(&matched), vec!["fred", "gary"]);
    }

    #[test]
    fn test_name_filter_is_trimmed_case_insensitive_substring() {
        let events = vec![
            make_test_event("Frederick", Phase::Model, Some("wip"), None, ts(1)),
            make_test_event("gary", Phase::Model, Some("wip"), None, ts(1)),
        ];
        let snapshot = ScopeSnapshot::build(&events);
        let mut query = PivotQuery::for_project("alpha");
        query.name_filter = Some("  ED  ".to_string());
        let matched = matching_entities(&snapshot, &query);
        assert_eq!(assets(&matched), vec!["Frederick"]);

        // Blank needle is no constraint.
        query.name_filter = Some("   ".to_string());
        assert_eq!(matching_entities(&snapshot, &query).len(), 2);
    }
}
