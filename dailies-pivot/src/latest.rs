//! Latest-row reduction over the status log.
//!
//! The log carries every write ever made; the pivot view only cares about
//! the current row per partition. "Current" means: not soft-deleted, and
//! greatest `(modified_at, event_id)` in its partition. The event id breaks
//! ties from coarse clocks deterministically, and UUIDv7 ids make the
//! winner the later write.

use dailies_core::{AssetKey, PartitionGranularity, Phase, StatusEvent};
use std::collections::BTreeMap;

/// Reduce a batch of events to the latest row per partition.
///
/// Emits exactly one row for every partition that has at least one
/// non-deleted event, nothing for partitions that do not, and never
/// fabricates rows. Output order is deterministic (entity key, then phase)
/// regardless of input order.
pub fn latest_per_partition(
    events: &[StatusEvent],
    granularity: PartitionGranularity,
) -> Vec<StatusEvent> {
    let mut winners: BTreeMap<(&AssetKey, Option<Phase>), &StatusEvent> = BTreeMap::new();
    for event in events {
        if event.deleted {
            continue;
        }
        let partition = match granularity {
            PartitionGranularity::EntityOnly => (&event.key, None),
            PartitionGranularity::EntityAndPhase => (&event.key, Some(event.phase)),
        };
        winners
            .entry(partition)
            .and_modify(|current| {
                if event.recency() > current.recency() {
                    *current = event;
                }
            })
            .or_insert(event);
    }
    winners.into_values().cloned().collect()
}

/// Per-phase latest rows of one entity.
#[derive(Debug, Clone, Default)]
pub struct EntityPhases {
    by_phase: BTreeMap<Phase, StatusEvent>,
}

impl EntityPhases {
    /// Latest row of one phase, if the phase has any visible event.
    pub fn phase_latest(&self, phase: Phase) -> Option<&StatusEvent> {
        self.by_phase.get(&phase)
    }

    /// Latest row across all phases of this entity.
    pub fn overall_latest(&self) -> Option<&StatusEvent> {
        self.by_phase.values().max_by_key(|e| e.recency())
    }

    /// Iterate phase columns in pipeline order.
    pub fn iter(&self) -> impl Iterator<Item = (&Phase, &StatusEvent)> {
        self.by_phase.iter()
    }
}

/// Per-entity index over one scope fetch.
///
/// Built once per query; filtering, ranking, and assembly all read this so
/// the page and its total come from the same snapshot of the log.
#[derive(Debug, Clone, Default)]
pub struct ScopeSnapshot {
    entities: BTreeMap<AssetKey, EntityPhases>,
}

impl ScopeSnapshot {
    /// Index a scope fetch. Soft-deleted events never make it in.
    pub fn build(events: &[StatusEvent]) -> Self {
        let mut entities: BTreeMap<AssetKey, EntityPhases> = BTreeMap::new();
        for event in latest_per_partition(events, PartitionGranularity::EntityAndPhase) {
            entities
                .entry(event.key.clone())
                .or_default()
                .by_phase
                .insert(event.phase, event);
        }
        ScopeSnapshot { entities }
    }

    pub fn entity(&self, key: &AssetKey) -> Option<&EntityPhases> {
        self.entities.get(key)
    }

    /// Iterate entities in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&AssetKey, &EntityPhases)> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
