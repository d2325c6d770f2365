//! In-memory status event store.
//!
//! First-class backend for tests and single-process development setups, not
//! just a mock: the pivot engine treats it exactly like the PostgreSQL
//! store. Lock poisoning surfaces as `StoreError::LockPoisoned` instead of
//! panicking.

use crate::store::StatusEventStore;
use async_trait::async_trait;
use dailies_core::{
    DailiesResult, EventId, EventListFilter, EventScope, StatusEvent, StoreError,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory event log keyed by event id.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    events: Arc<RwLock<HashMap<EventId, StatusEvent>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event. The log is append-only: an id collision is a
    /// caller bug, not an upsert.
    pub fn append(&self, event: &StatusEvent) -> DailiesResult<()> {
        let mut events = self
            .events
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        if events.contains_key(&event.event_id) {
            return Err(StoreError::DuplicateEvent { id: event.event_id }.into());
        }
        events.insert(event.event_id, event.clone());
        Ok(())
    }

    /// Flip an event's soft-delete flag on. Returns `false` when the id is
    /// unknown.
    pub fn soft_delete(&self, id: EventId) -> DailiesResult<bool> {
        let mut events = self
            .events
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        match events.get_mut(&id) {
            Some(event) => {
                event.deleted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Clear all stored events.
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.write() {
            events.clear();
        }
    }

    /// Count of stored events, deleted ones included.
    pub fn event_count(&self) -> usize {
        self.events.read().map(|e| e.len()).unwrap_or(0)
    }
}

fn in_scope(event: &StatusEvent, scope: &EventScope) -> bool {
    if event.key.project != scope.project {
        return false;
    }
    if let Some(root) = &scope.root {
        if event.key.root != *root {
            return false;
        }
    }
    if let Some(phase) = scope.phase {
        if event.phase != phase {
            return false;
        }
    }
    true
}

fn matches_filter(event: &StatusEvent, filter: &EventListFilter) -> bool {
    if event.key.project != filter.project {
        return false;
    }
    if !filter.include_deleted && event.deleted {
        return false;
    }
    if let Some(root) = &filter.root {
        if event.key.root != *root {
            return false;
        }
    }
    if let Some(phase) = filter.phase {
        if event.phase != phase {
            return false;
        }
    }
    if let Some(relation) = &filter.relation {
        if event.key.relation != *relation {
            return false;
        }
    }
    if let Some(needle) = &filter.asset_contains {
        let needle = needle.trim().to_lowercase();
        if !needle.is_empty() && !event.key.asset.to_lowercase().contains(&needle) {
            return false;
        }
    }
    true
}

#[async_trait]
impl StatusEventStore for MemoryStore {
    async fn events_in_scope(&self, scope: &EventScope) -> DailiesResult<Vec<StatusEvent>> {
        let events = self.events.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(events
            .values()
            .filter(|e| !e.deleted && in_scope(e, scope))
            .cloned()
            .collect())
    }

    async fn list_events(&self, filter: &EventListFilter) -> DailiesResult<Vec<StatusEvent>> {
        let events = self.events.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut matched: Vec<StatusEvent> = events
            .values()
            .filter(|e| matches_filter(e, filter))
            .cloned()
            .collect();
        // Newest first, ids break timestamp ties.
        matched.sort_by(|a, b| b.recency().cmp(&a.recency()));

        let offset = filter.offset.unwrap_or(0).max(0) as usize;
        let matched = match filter.limit {
            Some(limit) if limit >= 0 => matched
                .into_iter()
                .skip(offset)
                .take(limit as usize)
                .collect(),
            _ => matched.into_iter().skip(offset).collect(),
        };
        Ok(matched)
    }

    async fn health_check(&self) -> DailiesResult<bool> {
        Ok(self.events.read().is_ok())
    }
}

// ============================================================================
// TESTS
// ============================================================================
