//! REST API Routes Module
//!
//! Route handlers for the dailies review service:
//! - Pivot page listing (one row per asset, phases as columns)
//! - Raw status event listing for the review tools
//! - Health check endpoint
//! - OpenAPI document
//! - CORS support for browser-based review UIs

pub mod events;
pub mod health;
pub mod pivot;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use dailies_pivot::PivotEngine;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::ApiConfig;
use crate::openapi::ApiDoc;

/// Hard cap on request handling time. Pivot pages are computed in memory,
/// so anything this slow means the store is wedged.
const REQUEST_TIMEOUT_SECS: u64 = 30;

// Re-export route creation functions for convenience
pub use events::create_router as events_router;
pub use health::create_router as health_router;
pub use pivot::create_router as pivot_router;

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

/// Handler for /api/v1/openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// ============================================================================
// ROUTER COMPOSITION
// ============================================================================

/// Create the complete API router.
///
/// Read endpoints live under `/api/v1/asset-status`; the health probe and
/// the OpenAPI document sit beside them. CORS wraps everything so browser
/// review UIs can call the API cross-origin.
pub fn create_api_router(engine: PivotEngine, api_config: &ApiConfig) -> Router {
    let asset_status =
        pivot::create_router(engine.clone()).merge(events::create_router(engine.clone()));

    let cors = build_cors_layer(api_config);

    Router::new()
        .nest("/api/v1/asset-status", asset_status)
        .route("/api/v1/openapi.json", get(openapi_json))
        .merge(health::create_router(engine))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(cors)
}

// ============================================================================
// CORS
// ============================================================================

fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        // Development mode: allow all origins
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any).allow_headers(Any)
    } else {
        // Production mode: only allow configured origins
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        cors.allow_origin(origins)
    }
}
