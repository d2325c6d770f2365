//! OpenAPI Specification for the Dailies API
//!
//! This module defines the OpenAPI document for the REST API. It uses
//! utoipa to generate the specification from Rust types and route
//! annotations.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::health::{HealthResponse, HealthStatus};
use crate::routes::{events, health, pivot};
use crate::types::{EventListResponse, PivotPageResponse};

use dailies_core::{AssetKey, Phase, PhaseStatus, PivotRow, StatusEvent};

/// OpenAPI document for the Dailies API.
///
/// Generates the complete specification for the review service, including
/// all schemas and paths.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dailies API",
        version = "0.1.0",
        description = "Production asset review tracking - pivots the append-only per-phase status log into one row per asset",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    servers(
        (url = "http://localhost:8080", description = "Local Development")
    ),
    tags(
        (name = "Pivot", description = "One-row-per-asset status pivot with filtering, ordering, and pagination"),
        (name = "Events", description = "Raw append-only status event listing"),
        (name = "Health", description = "Service health checks")
    ),
    paths(
        pivot::get_pivot_page,
        events::list_status_events,
        health::health_check,
    ),
    components(
        schemas(
            // === Error Types ===
            ApiError, ErrorCode,

            // === Pivot Types ===
            PivotPageResponse, PivotRow, PhaseStatus,

            // === Event Types ===
            EventListResponse, StatusEvent, AssetKey, Phase,

            // === Health Types ===
            HealthResponse, HealthStatus,
        )
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI document as a JSON string.
    pub fn to_json() -> Result<String, serde_json::Error> {
        let openapi = Self::openapi();
        serde_json::to_string_pretty(&openapi)
    }
}
