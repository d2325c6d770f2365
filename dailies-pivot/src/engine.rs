//! The pivot engine facade.
//!
//! `execute` is the whole pipeline as a pure function over one batch of
//! events; `PivotEngine` wraps it with a store fetch. One fetch per query
//! means the page and its total always describe the same snapshot of the
//! log, whatever the backend does concurrently.

use crate::{assemble, filter, latest, rank};
use dailies_core::{
    DailiesResult, EventListFilter, EventScope, PartitionGranularity, PivotPage, PivotQuery,
    QueryError, StatusEvent,
};
use dailies_storage::StatusEventStore;
use std::sync::Arc;

/// Run the full pivot pipeline over one batch of scope events.
///
/// Pure and deterministic: identical events and query produce an identical
/// page, byte for byte.
pub fn execute(events: &[StatusEvent], query: &PivotQuery) -> PivotPage {
    let snapshot = latest::ScopeSnapshot::build(events);
    let candidates = filter::matching_entities(&snapshot, query);
    let total = candidates.len() as u64;
    let page_keys = rank::page(&snapshot, candidates, query);
    let rows = assemble::assemble(&snapshot, &page_keys);
    PivotPage { rows, total }
}

fn require_project(project: &str) -> Result<(), QueryError> {
    if project.trim().is_empty() {
        return Err(QueryError::MissingProject);
    }
    Ok(())
}

/// Store-backed pivot engine. Stateless between calls and cheap to clone;
/// concurrent queries need no coordination because nothing here writes.
#[derive(Clone)]
pub struct PivotEngine {
    store: Arc<dyn StatusEventStore>,
}

impl PivotEngine {
    pub fn new(store: Arc<dyn StatusEventStore>) -> Self {
        PivotEngine { store }
    }

    /// Convenience constructor taking any concrete store.
    pub fn with_store<S: StatusEventStore + 'static>(store: S) -> Self {
        Self::new(Arc::new(store))
    }

    /// One page of the pivot view plus the total match count.
    ///
    /// The project is validated before the store is consulted; an empty
    /// result is a page with `total = 0`, never an error.
    pub async fn pivot_page(&self, query: &PivotQuery) -> DailiesResult<PivotPage> {
        require_project(&query.project)?;
        let scope = EventScope {
            project: query.project.clone(),
            root: query.root.clone(),
            phase: None,
        };
        let events = self.store.events_in_scope(&scope).await?;
        let page = execute(&events, query);
        tracing::debug!(
            project = %query.project,
            fetched = events.len(),
            total = page.total,
            rows = page.rows.len(),
            "pivot page computed"
        );
        Ok(page)
    }

    /// Raw status event listing for the review services.
    ///
    /// `latest_only` reduces to the current row per (entity, phase) before
    /// paging, and implies the non-deleted view: a retracted row is not
    /// anyone's current status.
    pub async fn list_events(&self, filter: &EventListFilter) -> DailiesResult<Vec<StatusEvent>> {
        require_project(&filter.project)?;
        if !filter.latest_only {
            return self.store.list_events(filter).await;
        }

        // Reduce first, then page: store-side LIMIT would cut events the
        // reduction still needs.
        let mut unpaged = filter.clone();
        unpaged.limit = None;
        unpaged.offset = None;
        unpaged.include_deleted = false;
        let events = self.store.list_events(&unpaged).await?;
        let mut current =
            latest::latest_per_partition(&events, PartitionGranularity::EntityAndPhase);
        current.sort_by(|a, b| b.recency().cmp(&a.recency()));

        let offset = filter.offset.unwrap_or(0).max(0) as usize;
        let current = match filter.limit {
            Some(limit) if limit >= 0 => current
                .into_iter()
                .skip(offset)
                .take(limit as usize)
                .collect(),
            _ => current.into_iter().skip(offset).collect(),
        };
        Ok(current)
    }

    /// Probe the backing store.
    pub async fn health(&self) -> DailiesResult<bool> {
        self.store.health_check().await
    }
}

// ============================================================================
// TESTS
// ============================================================================
