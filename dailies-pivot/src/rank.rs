//! Ranking and pagination of matched entities.
//!
//! One comparator implements the whole ordering contract:
//!
//! 1. preferred-phase block: entities whose representative row is in the
//!    preferred phase come first (skipped when no phase is preferred);
//! 2. the primary sort dimension, reversed when descending, except that
//!    missing values sort last under both directions;
//! 3. fixed secondary keys: asset name then relation, always ascending;
//! 4. the full entity key, so the order is total and two runs over the
//!    same snapshot can never disagree.
//!
//! Slicing happens after the full ordering, which is what keeps offsets
//! meaningful across the phase-priority pass.

use crate::latest::{EntityPhases, ScopeSnapshot};
use dailies_core::{
    AssetKey, Phase, PivotQuery, SortDirection, SortKey, StatusEvent, StatusFamily, Timestamp,
};
use std::cmp::Ordering;

/// The row that stands for an entity in ranking: the preferred phase's
/// latest when set and present, otherwise the entity-wide latest. Unlike
/// filtering, ranking falls back instead of failing: an entity without the
/// preferred phase still needs a rank, just outside the priority block.
fn representative<'a>(
    entity: &'a EntityPhases,
    preferred_phase: Option<Phase>,
) -> Option<&'a StatusEvent> {
    preferred_phase
        .and_then(|p| entity.phase_latest(p))
        .or_else(|| entity.overall_latest())
}

/// Everything the comparator needs, computed once per entity.
struct RankRecord {
    key: AssetKey,
    name_ci: String,
    relation_ci: String,
    in_preferred: bool,
    rep_phase: Option<Phase>,
    rep_submitted: Option<Timestamp>,
    primary_status: Option<String>,
    primary_stamp: Option<Timestamp>,
}

fn build_record(key: AssetKey, entity: &EntityPhases, query: &PivotQuery) -> RankRecord {
    let rep = representative(entity, query.preferred_phase);
    let in_preferred = match (query.preferred_phase, rep) {
        (Some(preferred), Some(row)) => row.phase == preferred,
        _ => false,
    };

    let (primary_status, primary_stamp) = match query.order_key {
        Some(SortKey::ByStatus { phase, family }) => {
            let row = match phase {
                Some(p) => entity.phase_latest(p),
                None => rep,
            };
            let value = row.and_then(|r| match family {
                StatusFamily::Work => r.work_status.as_deref(),
                StatusFamily::Approval => r.approval_status.as_deref(),
            });
            (value.map(|v| v.trim().to_lowercase()), None)
        }
        Some(SortKey::ByTimestamp { phase }) => {
            let row = match phase {
                Some(p) => entity.phase_latest(p),
                None => rep,
            };
            (None, row.map(|r| r.modified_at))
        }
        _ => (None, None),
    };

    RankRecord {
        name_ci: key.asset.to_lowercase(),
        relation_ci: key.relation.to_lowercase(),
        key,
        in_preferred,
        rep_phase: rep.map(|r| r.phase),
        rep_submitted: rep.map(|r| r.modified_at),
        primary_status,
        primary_stamp,
    }
}

fn directed(ord: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

/// Compare optional dimension values. Present values respect the requested
/// direction; missing values sort last either way.
fn cmp_nulls_last<T: Ord>(a: Option<&T>, b: Option<&T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => directed(x.cmp(y), direction),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn cmp_records(a: &RankRecord, b: &RankRecord, query: &PivotQuery) -> Ordering {
    if query.preferred_phase.is_some() {
        let block = b.in_preferred.cmp(&a.in_preferred);
        if block != Ordering::Equal {
            return block;
        }
    }

    let direction = query.direction;
    let primary = match query.order_key {
        Some(SortKey::ByName) => directed(a.name_ci.cmp(&b.name_ci), direction),
        Some(SortKey::ByRelation) => directed(a.relation_ci.cmp(&b.relation_ci), direction),
        Some(SortKey::ByPhase) => {
            cmp_nulls_last(a.rep_phase.as_ref(), b.rep_phase.as_ref(), direction)
        }
        Some(SortKey::ByStatus { .. }) => {
            cmp_nulls_last(a.primary_status.as_ref(), b.primary_status.as_ref(), direction)
        }
        Some(SortKey::ByTimestamp { .. }) => {
            cmp_nulls_last(a.primary_stamp.as_ref(), b.primary_stamp.as_ref(), direction)
        }
        // Unknown/absent keys: the default ordering is the fixed chain
        // below plus a submitted-at leg.
        None => Ordering::Equal,
    };
    if primary != Ordering::Equal {
        return primary;
    }

    let by_name = a.name_ci.cmp(&b.name_ci);
    if by_name != Ordering::Equal {
        return by_name;
    }
    let by_relation = a.relation_ci.cmp(&b.relation_ci);
    if by_relation != Ordering::Equal {
        return by_relation;
    }
    if query.order_key.is_none() {
        let by_submitted = cmp_nulls_last(
            a.rep_submitted.as_ref(),
            b.rep_submitted.as_ref(),
            SortDirection::Asc,
        );
        if by_submitted != Ordering::Equal {
            return by_submitted;
        }
    }
    a.key.cmp(&b.key)
}

/// Order the candidate entities fully.
pub(crate) fn rank(
    snapshot: &ScopeSnapshot,
    candidates: Vec<AssetKey>,
    query: &PivotQuery,
) -> Vec<AssetKey> {
    let empty = EntityPhases::default();
    let mut records: Vec<RankRecord> = candidates
        .into_iter()
        .map(|key| {
            let entity = snapshot.entity(&key).unwrap_or(&empty);
            build_record(key, entity, query)
        })
        .collect();
    records.sort_by(|a, b| cmp_records(a, b, query));
    records.into_iter().map(|r| r.key).collect()
}

/// Order, then slice the requested window.
pub(crate) fn page(
    snapshot: &ScopeSnapshot,
    candidates: Vec<AssetKey>,
    query: &PivotQuery,
) -> Vec<AssetKey> {
    let ranked = rank(snapshot, candidates, query);
    let (offset, limit) = query.page_bounds();
    ranked.into_iter().skip(offset).take(limit).collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dailies_core::{new_event_id, StatusEvent};

    fn ts(month: u32, day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, month, day, 0, 0, 0).unwrap()
    }

    fn make_test_event(
        asset: &str,
        phase: Phase,
        work: Option<&str>,
        modified_at: Timestamp,
    ) -> StatusEvent {
        StatusEvent {
            event_id: new_event_id(),
            key: AssetKey::new("alpha", "chr", asset, "main"),
            phase,
            work_status: work.map(str::to_string),
            approval_status: None,
            modified_at,
            deleted: false,
        }
    }

    fn ranked_assets(events: &[StatusEvent], query: &PivotQuery) -> Vec<String> {
        let snapshot = ScopeSnapshot::build(events);
        let candidates = snapshot.iter().map(|(k, _)| k.clone()).collect();
        rank(&snapshot, candidates, query)
            .into_iter()
            .map(|k| k.asset)
            .collect()
    }

    /// A has only mdl (2024-01-01); B has mdl (2024-02-01) and rig
    /// (2024-01-15).
    fn two_asset_fixture() -> Vec<StatusEvent> {
        vec![
            make_test_event("a", Phase::Model, Some("wip"), ts(1, 1)),
            make_test_event("b", Phase::Model, Some("wip"), ts(2, 1)),
            make_test_event("b", Phase::Rig, Some("wip"), ts(1, 15)),
        ]
    }

    #[test]
    fn test_phase_qualified_timestamp_sort_both_directions() {
        let events = two_asset_fixture();
        let mut query = PivotQuery::for_project("alpha");

        query.order_key = SortKey::parse("mdl_submitted");
        query.direction = SortDirection::Asc;
        assert_eq!(ranked_assets(&events, &query), vec!["a", "b"]);

        query.direction = SortDirection::Desc;
        assert_eq!(ranked_assets(&events, &query), vec!["b", "a"]);
    }

    #[test]
    fn test_missing_dimension_sorts_last_in_both_directions() {
        // A has no rig row, so A trails under asc AND desc.
        let events = two_asset_fixture();
        let mut query = PivotQuery::for_project("alpha");
        query.order_key = SortKey::parse("rig_submitted");

        query.direction = SortDirection::Asc;
        assert_eq!(ranked_assets(&events, &query), vec!["b", "a"]);

        query.direction = SortDirection::Desc;
        assert_eq!(ranked_assets(&events, &query), vec!["b", "a"]);
    }

    #[test]
    fn test_status_sort_is_case_insensitive_with_nulls_last() {
        let events = vec![
            make_test_event("a", Phase::Model, Some("WIP"), ts(1, 1)),
            make_test_event("b", Phase::Model, Some("done"), ts(1, 1)),
            make_test_event("c", Phase::Model, None, ts(1, 1)),
        ];
        let mut query = PivotQuery::for_project("alpha");
        query.order_key = SortKey::parse("mdl_work");

        query.direction = SortDirection::Asc;
        assert_eq!(ranked_assets(&events, &query), vec!["b", "a", "c"]);

        // Direction flips the present values, never the null.
        query.direction = SortDirection::Desc;
        assert_eq!(ranked_assets(&events, &query), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_preferred_phase_blocks_precede_base_order() {
        let events = vec![
            make_test_event("a", Phase::Model, Some("wip"), ts(1, 1)),
            make_test_event("b", Phase::Rig, Some("wip"), ts(1, 2)),
            make_test_event("c", Phase::Model, Some("wip"), ts(1, 3)),
            make_test_event("d", Phase::Rig, Some("wip"), ts(1, 4)),
        ];
        let mut query = PivotQuery::for_project("alpha");
        query.preferred_phase = Some(Phase::Rig);
        // Base order inside each block is the default (name asc), so the
        // rig entities come first in name order, then the rest.
        assert_eq!(ranked_assets(&events, &query), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_preferred_phase_keeps_primary_dimension_inside_blocks() {
        let events = vec![
            make_test_event("a", Phase::Model, Some("wip"), ts(1, 1)),
            make_test_event("b", Phase::Rig, Some("wip"), ts(1, 4)),
            make_test_event("c", Phase::Model, Some("wip"), ts(1, 3)),
            make_test_event("d", Phase::Rig, Some("wip"), ts(1, 2)),
        ];
        let mut query = PivotQuery::for_project("alpha");
        query.preferred_phase = Some(Phase::Rig);
        query.order_key = SortKey::parse("submitted_at_utc");
        query.direction = SortDirection::Desc;
        // Rig block newest-first, then the others newest-first.
        assert_eq!(ranked_assets(&events, &query), vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_phase_sort_uses_pipeline_order() {
        let events = vec![
            make_test_event("a", Phase::LookDev, Some("wip"), ts(1, 1)),
            make_test_event("b", Phase::Model, Some("wip"), ts(1, 1)),
            make_test_event("c", Phase::Design, Some("wip"), ts(1, 1)),
        ];
        let mut query = PivotQuery::for_project("alpha");
        query.order_key = SortKey::parse("phase");
        assert_eq!(ranked_assets(&events, &query), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_default_ordering_is_name_relation_submitted() {
        let mut shared = make_test_event("same", Phase::Model, Some("wip"), ts(1, 1));
        shared.key.relation = "take2".to_string();
        let events = vec![
            make_test_event("zed", Phase::Model, Some("wip"), ts(1, 1)),
            make_test_event("same", Phase::Model, Some("wip"), ts(1, 2)),
            shared,
        ];
        let query = PivotQuery::for_project("alpha");
        let snapshot = ScopeSnapshot::build(&events);
        let candidates = snapshot.iter().map(|(k, _)| k.clone()).collect();
        let ranked = rank(&snapshot, candidates, &query);
        let pairs: Vec<(String, String)> = ranked
            .into_iter()
            .map(|k| (k.asset, k.relation))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("same".to_string(), "main".to_string()),
                ("same".to_string(), "take2".to_string()),
                ("zed".to_string(), "main".to_string()),
            ]
        );
    }

    #[test]
    fn test_page_slices_after_full_ordering() {
        let events: Vec<StatusEvent> = (0..10)
            .map(|i| {
                make_test_event(
                    &format!("asset-{:02}", i),
                    Phase::Model,
                    Some("wip"),
                    ts(1, 1 + i),
                )
            })
            .collect();
        let snapshot = ScopeSnapshot::build(&events);
        let candidates: Vec<AssetKey> = snapshot.iter().map(|(k, _)| k.clone()).collect();

        let mut query = PivotQuery::for_project("alpha");
        query.limit = 3;
        query.offset = 4;
        let window = page(&snapshot, candidates.clone(), &query);
        let names: Vec<&str> = window.iter().map(|k| k.asset.as_str()).collect();
        assert_eq!(names, vec!["asset-04", "asset-05", "asset-06"]);

        // Offset past the end is an empty page, not an error.
        query.offset = 99;
        assert!(page(&snapshot, candidates.clone(), &query).is_empty());

        // Non-positive limit falls back to the default page size.
        query.limit = 0;
        query.offset = 0;
        assert_eq!(page(&snapshot, candidates, &query).len(), 10);
    }

    #[test]
    fn test_order_is_total_across_equal_names() {
        let mut other_root = make_test_event("same", Phase::Model, Some("wip"), ts(1, 1));
        other_root.key.root = "prp".to_string();
        let events = vec![
            make_test_event("same", Phase::Model, Some("wip"), ts(1, 1)),
            other_root,
        ];
        let mut query = PivotQuery::for_project("alpha");
        query.order_key = SortKey::parse("name");

        let snapshot = ScopeSnapshot::build(&events);
        let forward: Vec<AssetKey> = snapshot.iter().map(|(k, _)| k.clone()).collect();
        let mut reversed = forward.clone();
        reversed.reverse();

        // Same total order no matter how candidates arrive.
        assert_eq!(
            rank(&snapshot, forward, &query),
            rank(&snapshot, reversed, &query)
        );
    }
}
