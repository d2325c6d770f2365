//! Dailies Pivot - Asset Review Pivot Engine
//!
//! Turns the append-only per-phase status log into a paginated, sortable,
//! filterable one-row-per-asset view. The pipeline per query:
//!
//! 1. fetch every non-deleted event in the (project, root) scope, once;
//! 2. reduce to the latest row per (entity, phase) ([`latest`]);
//! 3. evaluate name and status filters per entity (the match count is the
//!    page's `total`);
//! 4. rank with the preferred-phase block, the caller's sort dimension,
//!    and the fixed tie-breaks, then slice the requested window;
//! 5. assemble one pivot row per page entity.
//!
//! Steps 2-5 are pure ([`execute`]); [`PivotEngine`] adds the store fetch.

pub mod engine;
pub mod latest;

mod assemble;
mod filter;
mod rank;

pub use engine::{execute, PivotEngine};
pub use latest::{latest_per_partition, EntityPhases, ScopeSnapshot};
