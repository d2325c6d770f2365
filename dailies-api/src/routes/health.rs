//! Health Check Endpoint
//!
//! Single readiness probe backed by the event store: `GET /health` answers
//! 200 while the store responds and 503 once it stops. No authentication.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use dailies_pivot::PivotEngine;

// ============================================================================
// TYPES
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub uptime_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Unavailable,
}

// ============================================================================
// STATE
// ============================================================================

#[derive(Clone)]
pub struct HealthState {
    pub engine: PivotEngine,
    pub start_time: std::time::Instant,
}

impl HealthState {
    pub fn new(engine: PivotEngine) -> Self {
        Self {
            engine,
            start_time: std::time::Instant::now(),
        }
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /health - Readiness check (event store connectivity)
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "Event store is unreachable", body = HealthResponse),
    ),
)]
pub async fn health_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let healthy = matches!(state.engine.health().await, Ok(true));

    let response = HealthResponse {
        status: if healthy {
            HealthStatus::Ok
        } else {
            HealthStatus::Unavailable
        },
        uptime_secs: state.start_time.elapsed().as_secs(),
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the health check router (no auth required).
pub fn create_router(engine: PivotEngine) -> Router {
    let state = Arc::new(HealthState::new(engine));

    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}
