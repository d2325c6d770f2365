//! Error types for dailies operations

use thiserror::Error;

/// Query validation errors, raised before any store read.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Project is required and must be non-empty")]
    MissingProject,

    #[error("Invalid phase: {value}")]
    InvalidPhase { value: String },
}

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store backend error: {reason}")]
    Backend { reason: String },

    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Duplicate status event: {id}")]
    DuplicateEvent { id: uuid::Uuid },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Master error type for all dailies operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DailiesError {
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for dailies operations.
pub type DailiesResult<T> = Result<T, DailiesError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_display_missing_project() {
        let err = QueryError::MissingProject;
        let msg = format!("{}", err);
        assert!(msg.contains("Project is required"));
    }

    #[test]
    fn test_query_error_display_invalid_phase() {
        let err = QueryError::InvalidPhase {
            value: "comp".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Invalid phase"));
        assert!(msg.contains("comp"));
    }

    #[test]
    fn test_store_error_display_backend() {
        let err = StoreError::Backend {
            reason: "connection refused".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Store backend error"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_master_error_wraps_query_error() {
        let err: DailiesError = QueryError::MissingProject.into();
        let msg = format!("{}", err);
        assert!(msg.contains("Query error"));
        assert!(msg.contains("Project is required"));
    }

    #[test]
    fn test_master_error_wraps_store_error() {
        let err: DailiesError = StoreError::LockPoisoned.into();
        assert_eq!(
            format!("{}", err),
            "Store error: Store lock poisoned"
        );
    }
}
