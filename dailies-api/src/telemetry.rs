//! Tracing Setup for the API Server
//!
//! Installs a `tracing-subscriber` registry with an env-filter and either a
//! human-readable or JSON log format. Filtering defaults to debug-level for
//! this crate and info elsewhere; override with `RUST_LOG`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{ApiError, ApiResult};

/// Initialize the global tracing subscriber.
///
/// Set `DAILIES_LOG_FORMAT=json` for newline-delimited JSON output (for log
/// shippers); anything else gets the default human-readable format.
pub fn init_tracing() -> ApiResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("dailies_api=debug,tower_http=debug,info"));

    let json = std::env::var("DAILIES_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| ApiError::internal_error(format!("Failed to initialize tracing: {}", e)))
}
