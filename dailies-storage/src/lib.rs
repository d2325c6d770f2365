//! Dailies Storage - Status Event Store Implementations
//!
//! Defines the read abstraction over the append-only status log
//! (`StatusEventStore`) plus two backends: `MemoryStore` for tests and
//! single-process development, and `PgEventStore` for production, pooled
//! through deadpool-postgres. Write access (append, soft delete) is
//! inherent on the concrete stores; the pivot engine only needs the trait.

pub mod memory;
pub mod pg;
pub mod sql;
pub mod store;

pub use memory::MemoryStore;
pub use pg::{PgConfig, PgEventStore};
pub use sql::SqlParam;
pub use store::StatusEventStore;
