//! Pivot REST API Routes
//!
//! The pivot endpoint turns the append-only status event log into one row
//! per asset, with the latest status of every phase spread across columns.
//! Filtering, ordering, and pagination all happen in the engine against a
//! single scope snapshot, so `rows` and `total` always agree.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use dailies_pivot::PivotEngine;

use crate::error::{ApiError, ApiResult};
use crate::types::{PivotPageParams, PivotPageResponse};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/asset-status/pivot - One page of the per-asset status pivot
#[utoipa::path(
    get,
    path = "/api/v1/asset-status/pivot",
    tag = "Pivot",
    params(
        ("project" = String, Query, description = "Production the assets belong to"),
        ("root" = Option<String>, Query, description = "Restrict to one asset root"),
        ("name" = Option<String>, Query, description = "Case-insensitive substring filter on the asset name"),
        ("phase" = Option<String>, Query, description = "Preferred phase code; blank or 'none' disables the phase bias"),
        ("approval" = Option<String>, Query, description = "Comma-separated approval status values"),
        ("work" = Option<String>, Query, description = "Comma-separated work status values"),
        ("order" = Option<String>, Query, description = "Sort key, e.g. name, mdl_appr, rig_submitted"),
        ("direction" = Option<String>, Query, description = "Sort direction: asc (default) or desc"),
        ("limit" = Option<i64>, Query, description = "Maximum rows per page (default 60)"),
        ("offset" = Option<i64>, Query, description = "Page start offset"),
    ),
    responses(
        (status = 200, description = "One pivot page with the total match count", body = PivotPageResponse),
        (status = 400, description = "Missing project or unknown phase", body = ApiError),
        (status = 500, description = "Event store failure", body = ApiError),
    ),
)]
pub async fn get_pivot_page(
    State(engine): State<PivotEngine>,
    Query(params): Query<PivotPageParams>,
) -> ApiResult<impl IntoResponse> {
    let query = params.into_query()?;
    let page = engine.pivot_page(&query).await?;
    Ok(Json(PivotPageResponse::from(page)))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the pivot router.
pub fn create_router(engine: PivotEngine) -> Router {
    Router::new()
        .route("/pivot", get(get_pivot_page))
        .with_state(engine)
}
