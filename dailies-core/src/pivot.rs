//! Pivot view rows: one row per asset, one column set per phase

use crate::event::AssetKey;
use crate::identity::Timestamp;
use crate::phase::Phase;
use serde::{Deserialize, Serialize};

/// Latest status of one phase inside a pivot row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PhaseStatus {
    pub work_status: Option<String>,
    pub approval_status: Option<String>,
    #[cfg_attr(
        feature = "openapi",
        schema(value_type = Option<chrono::DateTime<chrono::Utc>>)
    )]
    pub submitted_at: Option<Timestamp>,
}

/// One denormalized row of the pivot view. Derived, never persisted.
///
/// The five phase columns are fixed; a phase with no visible status event
/// stays `None`. An entity whose events are all soft-deleted still renders
/// as an all-null row when something else (the name filter with no status
/// filter) lets it through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PivotRow {
    #[serde(flatten)]
    pub key: AssetKey,
    pub mdl: Option<PhaseStatus>,
    pub rig: Option<PhaseStatus>,
    pub bld: Option<PhaseStatus>,
    pub dsn: Option<PhaseStatus>,
    pub ldv: Option<PhaseStatus>,
}

impl PivotRow {
    /// All-null row for an entity key.
    pub fn empty(key: AssetKey) -> Self {
        PivotRow {
            key,
            mdl: None,
            rig: None,
            bld: None,
            dsn: None,
            ldv: None,
        }
    }

    /// Fixed phase-to-column mapping, read side.
    pub fn phase_status(&self, phase: Phase) -> Option<&PhaseStatus> {
        match phase {
            Phase::Model => self.mdl.as_ref(),
            Phase::Rig => self.rig.as_ref(),
            Phase::Build => self.bld.as_ref(),
            Phase::Design => self.dsn.as_ref(),
            Phase::LookDev => self.ldv.as_ref(),
        }
    }

    /// Fixed phase-to-column mapping, write side.
    pub fn set_phase_status(&mut self, phase: Phase, status: PhaseStatus) {
        match phase {
            Phase::Model => self.mdl = Some(status),
            Phase::Rig => self.rig = Some(status),
            Phase::Build => self.bld = Some(status),
            Phase::Design => self.dsn = Some(status),
            Phase::LookDev => self.ldv = Some(status),
        }
    }
}

/// One page of the pivot view plus the total match count.
///
/// `total` counts every entity matching the filters, not the rows on this
/// page, so it is stable across offsets of the same query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PivotPage {
    pub rows: Vec<PivotRow>,
    pub total: u64,
}

// ============================================================================
// TESTS
// ============================================================================
