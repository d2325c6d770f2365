//! API Request and Response Types
//!
//! Wire-level shapes for the REST endpoints, plus the lowering from raw
//! query-string parameters into the typed descriptors the engine consumes.
//!
//! Lowering policy: a parameter that changes *which* rows match (the
//! preferred phase) is rejected when unparseable; parameters that only
//! change presentation (sort key, direction) silently fall back to the
//! defaults.

use serde::{Deserialize, Serialize};

use dailies_core::{
    EventListFilter, Phase, PivotPage, PivotQuery, PivotRow, QueryError, SortDirection, SortKey,
    StatusEvent, StatusFilter,
};

// ============================================================================
// PIVOT PAGE TYPES
// ============================================================================

/// Query parameters for the pivot page listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotPageParams {
    /// Production the assets belong to (required)
    pub project: Option<String>,
    /// Restrict to one asset root/sequence
    pub root: Option<String>,
    /// Case-insensitive substring filter on the asset name
    pub name: Option<String>,
    /// Preferred phase code; blank or "none" disables the phase bias
    pub phase: Option<String>,
    /// Comma-separated approval status values
    pub approval: Option<String>,
    /// Comma-separated work status values
    pub work: Option<String>,
    /// Sort key, e.g. "name", "mdl_appr", "rig_submitted"
    pub order: Option<String>,
    /// Sort direction: "asc" (default) or "desc"
    pub direction: Option<String>,
    /// Maximum rows per page
    pub limit: Option<i64>,
    /// Page start offset
    pub offset: Option<i64>,
}

impl PivotPageParams {
    /// Lower the raw wire parameters into a typed pivot query.
    ///
    /// The project presence check happens in the engine, so an absent
    /// project lowers to the empty string here and is rejected there.
    pub fn into_query(self) -> Result<PivotQuery, QueryError> {
        let preferred_phase = parse_phase_param(self.phase.as_deref())?;

        let status_filter = StatusFilter::new(
            split_csv(self.approval.as_deref()),
            split_csv(self.work.as_deref()),
        );

        let order_key = self.order.as_deref().and_then(SortKey::parse);
        let direction = self
            .direction
            .as_deref()
            .and_then(|raw| raw.parse::<SortDirection>().ok())
            .unwrap_or_default();

        Ok(PivotQuery {
            project: self.project.unwrap_or_default(),
            root: none_if_blank(self.root),
            name_filter: none_if_blank(self.name),
            preferred_phase,
            status_filter,
            order_key,
            direction,
            limit: self.limit.unwrap_or(0),
            offset: self.offset.unwrap_or(0),
        })
    }
}

/// One page of the pivot, plus the total number of matching entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PivotPageResponse {
    /// One row per asset, in ranked order
    pub rows: Vec<PivotRow>,
    /// Total matching entities before pagination
    pub total: u64,
}

impl From<PivotPage> for PivotPageResponse {
    fn from(page: PivotPage) -> Self {
        Self {
            rows: page.rows,
            total: page.total,
        }
    }
}

// ============================================================================
// EVENT LISTING TYPES
// ============================================================================

/// Query parameters for the raw status event listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventListParams {
    /// Production the events belong to (required)
    pub project: Option<String>,
    /// Restrict to one asset root/sequence
    pub root: Option<String>,
    /// Restrict to one phase; blank or "none" means all phases
    pub phase: Option<String>,
    /// Case-insensitive substring filter on the asset name
    pub name: Option<String>,
    /// Exact relation/take match
    pub relation: Option<String>,
    /// Keep only the latest event per (asset, phase)
    pub latest: Option<bool>,
    /// Include soft-deleted events (ignored under `latest`)
    pub include_deleted: Option<bool>,
    /// Maximum events to return
    pub limit: Option<i64>,
    /// Listing start offset
    pub offset: Option<i64>,
}

impl EventListParams {
    /// Lower the raw wire parameters into a typed listing filter.
    pub fn into_filter(self) -> Result<EventListFilter, QueryError> {
        let phase = parse_phase_param(self.phase.as_deref())?;

        Ok(EventListFilter {
            project: self.project.unwrap_or_default(),
            root: none_if_blank(self.root),
            phase,
            asset_contains: none_if_blank(self.name),
            relation: none_if_blank(self.relation),
            latest_only: self.latest.unwrap_or(false),
            include_deleted: self.include_deleted.unwrap_or(false),
            limit: self.limit,
            offset: self.offset,
        })
    }
}

/// Raw status events, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EventListResponse {
    /// Matching status events
    pub events: Vec<StatusEvent>,
}

// ============================================================================
// PARAMETER LOWERING HELPERS
// ============================================================================

/// Parse an optional phase parameter. Blank and the literal "none" both mean
/// "no phase", matching what review UIs send for the cleared dropdown state.
fn parse_phase_param(raw: Option<&str>) -> Result<Option<Phase>, QueryError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    trimmed.parse::<Phase>().map(Some).map_err(|_| {
        QueryError::InvalidPhase {
            value: trimmed.to_string(),
        }
    })
}

/// Split a comma-separated parameter into raw entries. Entry-level trimming
/// and lowercasing happens in `StatusFilter::new`.
fn split_csv(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| s.split(',').map(str::to_string).collect())
        .unwrap_or_default()
}

/// Treat blank strings as absent. Query strings deliver `?root=` as
/// `Some("")`, which callers mean as "no filter".
fn none_if_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
