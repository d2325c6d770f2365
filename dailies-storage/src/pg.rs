//! PostgreSQL status event store.
//!
//! Connection pooling via deadpool-postgres. The log table (`status_event`)
//! is owned by the review services that write it; this store assumes the
//! table exists with the shape below and never runs DDL.
//!
//! ```sql
//! -- event_id UUID PRIMARY KEY,
//! -- project TEXT, root TEXT, asset TEXT, relation TEXT,
//! -- phase TEXT, work_status TEXT NULL, approval_status TEXT NULL,
//! -- modified_at TIMESTAMPTZ, deleted BOOLEAN
//! ```

use crate::sql::{list_query, scope_query, sql_params, SqlParam, SELECT_COLUMNS, TABLE};
use crate::store::StatusEventStore;
use async_trait::async_trait;
use dailies_core::{
    DailiesError, DailiesResult, EventId, EventListFilter, EventScope, Phase, StatusEvent,
    StoreError,
};
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use std::time::Duration;
use tokio_postgres::{NoTls, Row};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct PgConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Connection timeout
    pub timeout: Duration,
}

impl Default for PgConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "dailies".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl PgConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("DAILIES_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("DAILIES_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("DAILIES_DB_NAME").unwrap_or_else(|_| "dailies".to_string()),
            user: std::env::var("DAILIES_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("DAILIES_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("DAILIES_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("DAILIES_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> DailiesResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls).map_err(|e| {
            StoreError::Unavailable {
                reason: format!("Failed to create pool: {}", e),
            }
        })?;

        Ok(pool)
    }
}

// ============================================================================
// POSTGRES EVENT STORE
// ============================================================================

/// PostgreSQL-backed status event store.
#[derive(Clone)]
pub struct PgEventStore {
    pool: Pool,
}

impl PgEventStore {
    /// Create a new store with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new store from configuration.
    pub fn from_config(config: &PgConfig) -> DailiesResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get the current pool size for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> DailiesResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(|e| {
            tracing::error!(error = %e, "connection pool checkout failed");
            StoreError::Unavailable {
                reason: "connection pool exhausted or backend down".to_string(),
            }
            .into()
        })
    }

    /// Append one event to the log.
    pub async fn append(&self, event: &StatusEvent) -> DailiesResult<()> {
        let conn = self.get_conn().await?;
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            TABLE, SELECT_COLUMNS
        );
        let params = [
            SqlParam::Uuid(event.event_id),
            SqlParam::String(event.key.project.clone()),
            SqlParam::String(event.key.root.clone()),
            SqlParam::String(event.key.asset.clone()),
            SqlParam::String(event.key.relation.clone()),
            SqlParam::String(event.phase.code().to_string()),
            SqlParam::OptString(event.work_status.clone()),
            SqlParam::OptString(event.approval_status.clone()),
            SqlParam::Timestamp(event.modified_at),
            SqlParam::Bool(event.deleted),
        ];
        conn.execute(sql.as_str(), &sql_params(&params))
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    /// Flip an event's soft-delete flag on. Returns `false` when the id is
    /// unknown.
    pub async fn soft_delete(&self, id: EventId) -> DailiesResult<bool> {
        let conn = self.get_conn().await?;
        let sql = format!("UPDATE {} SET deleted = TRUE WHERE event_id = $1", TABLE);
        let updated = conn
            .execute(sql.as_str(), &[&id])
            .await
            .map_err(backend_error)?;
        Ok(updated > 0)
    }
}

/// Map a driver error to the store taxonomy. The full error is logged here;
/// outward-facing layers only ever see the sanitized reason.
fn backend_error(e: tokio_postgres::Error) -> DailiesError {
    tracing::error!(error = %e, "postgres operation failed");
    StoreError::Backend {
        reason: e.to_string(),
    }
    .into()
}

fn row_to_event(row: &Row) -> DailiesResult<StatusEvent> {
    let phase_code: String = row.try_get("phase").map_err(backend_error)?;
    let phase: Phase = phase_code.parse().map_err(|_| StoreError::Backend {
        reason: format!("Unknown phase code in log: {}", phase_code),
    })?;
    Ok(StatusEvent {
        event_id: row.try_get("event_id").map_err(backend_error)?,
        key: dailies_core::AssetKey {
            project: row.try_get("project").map_err(backend_error)?,
            root: row.try_get("root").map_err(backend_error)?,
            asset: row.try_get("asset").map_err(backend_error)?,
            relation: row.try_get("relation").map_err(backend_error)?,
        },
        phase,
        work_status: row.try_get("work_status").map_err(backend_error)?,
        approval_status: row.try_get("approval_status").map_err(backend_error)?,
        modified_at: row.try_get("modified_at").map_err(backend_error)?,
        deleted: row.try_get("deleted").map_err(backend_error)?,
    })
}

#[async_trait]
impl StatusEventStore for PgEventStore {
    async fn events_in_scope(&self, scope: &EventScope) -> DailiesResult<Vec<StatusEvent>> {
        let conn = self.get_conn().await?;
        let (sql, params) = scope_query(scope);
        tracing::debug!(project = %scope.project, "fetching scope events");
        let rows = conn
            .query(sql.as_str(), &sql_params(&params))
            .await
            .map_err(backend_error)?;
        rows.iter().map(row_to_event).collect()
    }

    async fn list_events(&self, filter: &EventListFilter) -> DailiesResult<Vec<StatusEvent>> {
        let conn = self.get_conn().await?;
        let (sql, params) = list_query(filter);
        tracing::debug!(project = %filter.project, "listing raw events");
        let rows = conn
            .query(sql.as_str(), &sql_params(&params))
            .await
            .map_err(backend_error)?;
        rows.iter().map(row_to_event).collect()
    }

    async fn health_check(&self) -> DailiesResult<bool> {
        let conn = self.get_conn().await?;
        conn.query_one("SELECT 1", &[])
            .await
            .map_err(backend_error)?;
        Ok(true)
    }
}

// ============================================================================
// DB-BACKED TESTS (need a live PostgreSQL, gated behind `db-tests`)
// ============================================================================
