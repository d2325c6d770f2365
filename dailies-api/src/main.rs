//! Dailies API Server Entry Point
//!
//! Bootstraps tracing and the Postgres-backed event store, then starts the
//! Axum HTTP server.

use std::net::SocketAddr;

use axum::Router;

use dailies_api::{create_api_router, init_tracing, ApiConfig, ApiError, ApiResult};
use dailies_pivot::PivotEngine;
use dailies_storage::{PgConfig, PgEventStore};

#[tokio::main]
async fn main() -> ApiResult<()> {
    init_tracing()?;

    let pg_config = PgConfig::from_env();
    let store = PgEventStore::from_config(&pg_config)?;
    let engine = PivotEngine::with_store(store);

    let api_config = ApiConfig::from_env();
    let app: Router = create_api_router(engine, &api_config);

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, "Starting dailies API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    let host = std::env::var("DAILIES_API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port_str = std::env::var("PORT")
        .ok()
        .or_else(|| std::env::var("DAILIES_API_PORT").ok())
        .unwrap_or_else(|| "8080".to_string());
    let port = port_str
        .parse::<u16>()
        .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", port_str)))?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
}
