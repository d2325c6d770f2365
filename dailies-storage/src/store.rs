//! Async read trait over the status event log.
//!
//! The pivot engine only ever reads; writes (append, soft delete) belong to
//! the review services that own the log and are inherent methods on the
//! concrete stores. Keeping the trait read-only lets the engine take any
//! backend without caring who mutates it.

use async_trait::async_trait;
use dailies_core::{DailiesResult, EventListFilter, EventScope, StatusEvent};

/// Async read access to the status event log.
#[async_trait]
pub trait StatusEventStore: Send + Sync {
    // ========================================================================
    // PIVOT READ PATH
    // ========================================================================

    /// Fetch every non-deleted event in a project/root scope.
    ///
    /// One call per pivot query; filtering, reduction, ranking, and assembly
    /// all derive from this single snapshot so the page and its total can
    /// never disagree.
    async fn events_in_scope(&self, scope: &EventScope) -> DailiesResult<Vec<StatusEvent>>;

    // ========================================================================
    // RAW LISTING
    // ========================================================================

    /// List raw events with filters, newest first
    /// (`modified_at` desc, `event_id` desc).
    ///
    /// Soft-deleted events are excluded unless the filter asks for them.
    /// `limit`/`offset` apply store-side when present; the `latest_only`
    /// reduction happens above this trait, so implementations ignore that
    /// flag here.
    async fn list_events(&self, filter: &EventListFilter) -> DailiesResult<Vec<StatusEvent>>;

    // ========================================================================
    // HEALTH
    // ========================================================================

    /// Probe the backend. `Ok(true)` means reads are expected to succeed.
    async fn health_check(&self) -> DailiesResult<bool>;
}
