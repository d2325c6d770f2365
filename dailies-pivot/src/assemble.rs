//! Pivot row assembly for one page of ranked entity keys.

use crate::latest::ScopeSnapshot;
use dailies_core::{AssetKey, PhaseStatus, PivotRow, StatusEvent};

fn to_phase_status(event: &StatusEvent) -> PhaseStatus {
    PhaseStatus {
        work_status: event.work_status.clone(),
        approval_status: event.approval_status.clone(),
        submitted_at: Some(event.modified_at),
    }
}

/// Build one pivot row per key, in the order given. Ranking already decided
/// the order; assembly never re-sorts. Keys without visible rows (every
/// event soft-deleted between ranking and here, or none ever written) come
/// out as all-null rows rather than disappearing and shifting the page.
pub(crate) fn assemble(snapshot: &ScopeSnapshot, keys: &[AssetKey]) -> Vec<PivotRow> {
    keys.iter()
        .map(|key| {
            let mut row = PivotRow::empty(key.clone());
            if let Some(entity) = snapshot.entity(key) {
                for (phase, event) in entity.iter() {
                    row.set_phase_status(*phase, to_phase_status(event));
                }
            }
            row
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
