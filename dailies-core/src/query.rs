//! Query descriptors consumed by the storage layer and the pivot engine
//!
//! One `PivotQuery` drives both the row listing and the total count, so the
//! two can never disagree about which entities match. All descriptors are
//! plain data; the storage layer lowers them to parameterized SQL and the
//! engine lowers them to in-memory predicates.

use crate::order::{SortDirection, SortKey};
use crate::phase::Phase;
use serde::{Deserialize, Serialize};

/// Page size used when the caller passes a non-positive limit.
pub const DEFAULT_PAGE_LIMIT: i64 = 60;

/// How the latest-row reduction partitions the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartitionGranularity {
    /// One row per entity key: the latest event across all phases.
    EntityOnly,
    /// One row per (entity key, phase) pair.
    EntityAndPhase,
}

/// Scope of a pivot read: which slice of the log to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventScope {
    pub project: String,
    pub root: Option<String>,
    pub phase: Option<Phase>,
}

impl EventScope {
    pub fn project(project: impl Into<String>) -> Self {
        EventScope {
            project: project.into(),
            root: None,
            phase: None,
        }
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }
}

/// Filters for the raw status event listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventListFilter {
    pub project: String,
    pub root: Option<String>,
    pub phase: Option<Phase>,
    /// Case-insensitive substring match on the asset name.
    pub asset_contains: Option<String>,
    /// Exact relation/take match.
    pub relation: Option<String>,
    /// Reduce to the latest row per (entity, phase) before paging.
    pub latest_only: bool,
    /// Expose soft-deleted events (the review services need to see
    /// retractions; the pivot view never sets this).
    pub include_deleted: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl EventListFilter {
    pub fn project(project: impl Into<String>) -> Self {
        EventListFilter {
            project: project.into(),
            ..Default::default()
        }
    }
}

/// Status membership filter: OR across the two vocabularies.
///
/// Values are trimmed and lowercased once at construction; candidates are
/// normalized the same way at match time. Empty lists on both sides mean
/// "match everything".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFilter {
    approval: Vec<String>,
    work: Vec<String>,
}

impl StatusFilter {
    pub fn new<A, W>(approval: A, work: W) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        StatusFilter {
            approval: Self::normalize_values(approval),
            work: Self::normalize_values(work),
        }
    }

    fn normalize_values<I>(values: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        values
            .into_iter()
            .map(|v| v.as_ref().trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .collect()
    }

    /// True when no status constraint is present at all.
    pub fn matches_all(&self) -> bool {
        self.approval.is_empty() && self.work.is_empty()
    }

    /// Evaluate one row's status pair. A row matches when its approval
    /// status is in the approval list OR its work status is in the work
    /// list. With no constraint every row matches, including all-null ones.
    pub fn matches(&self, work: Option<&str>, approval: Option<&str>) -> bool {
        if self.matches_all() {
            return true;
        }
        let in_list = |list: &[String], value: Option<&str>| {
            value
                .map(|v| v.trim().to_lowercase())
                .map(|v| list.iter().any(|want| *want == v))
                .unwrap_or(false)
        };
        in_list(&self.approval, approval) || in_list(&self.work, work)
    }
}

/// Everything one pivot page request needs. Shared by the count and the
/// listing so pagination arithmetic always agrees with `total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotQuery {
    pub project: String,
    pub root: Option<String>,
    /// Case-insensitive substring filter on the asset name.
    pub name_filter: Option<String>,
    /// Phase bias: scopes the status filter to this phase's latest row and
    /// ranks entities whose representative row is in it first. `None` means
    /// filter on the entity-wide latest and skip the priority pass.
    pub preferred_phase: Option<Phase>,
    pub status_filter: StatusFilter,
    /// Parsed order key; `None` selects the default ordering
    /// (asset name, relation, submitted-at).
    pub order_key: Option<SortKey>,
    pub direction: SortDirection,
    /// Requested page size; non-positive values fall back to
    /// [`DEFAULT_PAGE_LIMIT`].
    pub limit: i64,
    /// Requested page start; negative values clamp to zero.
    pub offset: i64,
}

impl PivotQuery {
    pub fn for_project(project: impl Into<String>) -> Self {
        PivotQuery {
            project: project.into(),
            root: None,
            name_filter: None,
            preferred_phase: None,
            status_filter: StatusFilter::default(),
            order_key: None,
            direction: SortDirection::Asc,
            limit: 0,
            offset: 0,
        }
    }

    /// Normalized paging window: offset clamped to zero, limit defaulted
    /// when non-positive.
    pub fn page_bounds(&self) -> (usize, usize) {
        let offset = self.offset.max(0) as usize;
        let limit = if self.limit <= 0 {
            DEFAULT_PAGE_LIMIT as usize
        } else {
            self.limit as usize
        };
        (offset, limit)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter_empty_matches_everything() {
        let filter = StatusFilter::default();
        assert!(filter.matches_all());
        assert!(filter.matches(None, None));
        assert!(filter.matches(Some("wip"), None));
    }

    #[test]
    fn test_status_filter_or_across_families() {
        let filter = StatusFilter::new(["approved"], ["wip"]);
        // Approval hit, work miss.
        assert!(filter.matches(Some("done"), Some("approved")));
        // Work hit, approval miss.
        assert!(filter.matches(Some("wip"), Some("retake")));
        // Neither hits.
        assert!(!filter.matches(Some("done"), Some("retake")));
        // Null statuses never match a non-empty filter.
        assert!(!filter.matches(None, None));
    }

    #[test]
    fn test_status_filter_normalizes_both_sides() {
        let filter = StatusFilter::new(["  Approved "], Vec::<String>::new());
        assert!(filter.matches(None, Some("APPROVED")));
        assert!(filter.matches(None, Some("  approved  ")));
        assert!(!filter.matches(None, Some("approve")));
    }

    #[test]
    fn test_status_filter_drops_blank_values() {
        let filter = StatusFilter::new(["", "   "], ["", "wip"]);
        // Blank entries vanish; only "wip" constrains.
        assert!(!filter.matches_all());
        assert!(filter.matches(Some("wip"), None));
        assert!(!filter.matches(Some("done"), None));
    }

    #[test]
    fn test_page_bounds_defaults_and_clamps() {
        let mut query = PivotQuery::for_project("alpha");
        assert_eq!(query.page_bounds(), (0, DEFAULT_PAGE_LIMIT as usize));

        query.limit = -5;
        query.offset = -10;
        assert_eq!(query.page_bounds(), (0, DEFAULT_PAGE_LIMIT as usize));

        query.limit = 25;
        query.offset = 50;
        assert_eq!(query.page_bounds(), (50, 25));
    }
}
