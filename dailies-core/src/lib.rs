//! Dailies Core - Entity Types and Query Descriptors
//!
//! Pure data structures for the asset review status tracker. All other
//! crates depend on this. The log entities (`StatusEvent`), the derived
//! pivot view (`PivotRow`), and the typed query descriptors (`PivotQuery`,
//! `SortKey`, `StatusFilter`) live here; the behavior that interprets them
//! lives in `dailies-pivot` and `dailies-storage`.

pub mod error;
pub mod event;
pub mod identity;
pub mod order;
pub mod phase;
pub mod pivot;
pub mod query;

// Re-export commonly used types
pub use error::{DailiesError, DailiesResult, QueryError, StoreError};
pub use event::{AssetKey, StatusEvent};
pub use identity::{new_event_id, EventId, Timestamp};
pub use order::{SortDirection, SortKey, StatusFamily};
pub use phase::Phase;
pub use pivot::{PhaseStatus, PivotPage, PivotRow};
pub use query::{
    EventListFilter, EventScope, PartitionGranularity, PivotQuery, StatusFilter,
    DEFAULT_PAGE_LIMIT,
};
