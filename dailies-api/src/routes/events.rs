//! Status Event Listing Routes
//!
//! Raw access to the append-only log for the review tools that work on
//! individual submissions rather than the pivot. Soft-deleted events stay
//! hidden unless `include_deleted` is set; under `latest` the listing is
//! reduced to the current row per (asset, phase) before pagination.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use dailies_pivot::PivotEngine;

use crate::error::{ApiError, ApiResult};
use crate::types::{EventListParams, EventListResponse};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/asset-status/events - List raw status events, newest first
#[utoipa::path(
    get,
    path = "/api/v1/asset-status/events",
    tag = "Events",
    params(
        ("project" = String, Query, description = "Production the events belong to"),
        ("root" = Option<String>, Query, description = "Restrict to one asset root"),
        ("phase" = Option<String>, Query, description = "Restrict to one phase; blank or 'none' means all phases"),
        ("name" = Option<String>, Query, description = "Case-insensitive substring filter on the asset name"),
        ("relation" = Option<String>, Query, description = "Exact relation/take match"),
        ("latest" = Option<bool>, Query, description = "Keep only the latest event per (asset, phase)"),
        ("include_deleted" = Option<bool>, Query, description = "Include soft-deleted events (ignored under latest)"),
        ("limit" = Option<i64>, Query, description = "Maximum events to return"),
        ("offset" = Option<i64>, Query, description = "Listing start offset"),
    ),
    responses(
        (status = 200, description = "Matching status events", body = EventListResponse),
        (status = 400, description = "Missing project or unknown phase", body = ApiError),
        (status = 500, description = "Event store failure", body = ApiError),
    ),
)]
pub async fn list_status_events(
    State(engine): State<PivotEngine>,
    Query(params): Query<EventListParams>,
) -> ApiResult<impl IntoResponse> {
    let filter = params.into_filter()?;
    let events = engine.list_events(&filter).await?;
    Ok(Json(EventListResponse { events }))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the event listing router.
pub fn create_router(engine: PivotEngine) -> Router {
    Router::new()
        .route("/events", get(list_status_events))
        .with_state(engine)
}
