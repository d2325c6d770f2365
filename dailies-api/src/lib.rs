//! Dailies API - REST API Layer
//!
//! HTTP surface for the dailies asset review service. Exposes the pivot
//! page listing (one row per asset, latest status per phase), raw status
//! event listing, a health probe, and the OpenAPI document, all over Axum.
//!
//! The API layer is read-only: writes to the status event log belong to
//! the review ingest services, which share the storage crate.

pub mod config;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use telemetry::init_tracing;
pub use types::*;
