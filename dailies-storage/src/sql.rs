//! Parameterized SQL composition for the PostgreSQL store.
//!
//! Query descriptors lower to `(sql, params)` pairs here, as pure functions
//! so the statement text is unit-testable without a database. Caller values
//! only ever travel as `$n` parameters; the only interpolated pieces are
//! integers we computed ourselves (LIMIT/OFFSET) and fixed column lists.

use dailies_core::{EventListFilter, EventScope};
use tokio_postgres::types::ToSql;

/// Log table owned by the review services; this crate only assumes its
/// shape, never creates it.
pub(crate) const TABLE: &str = "status_event";

/// Column list shared by every SELECT, in struct field order.
pub(crate) const SELECT_COLUMNS: &str = "event_id, project, root, asset, relation, phase, \
     work_status, approval_status, modified_at, deleted";

/// Typed SQL parameter. Keeps heterogeneous parameter vectors buildable
/// without boxing every value separately.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// UUID value
    Uuid(uuid::Uuid),
    /// String value
    String(String),
    /// Optional string value
    OptString(Option<String>),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(chrono::DateTime<chrono::Utc>),
}

impl SqlParam {
    /// Convert this SqlParam to a reference usable with tokio_postgres.
    pub fn as_to_sql(&self) -> &(dyn ToSql + Sync) {
        match self {
            SqlParam::Uuid(v) => v,
            SqlParam::String(v) => v,
            SqlParam::OptString(v) => v,
            SqlParam::Bool(v) => v,
            SqlParam::Timestamp(v) => v,
        }
    }
}

/// Borrow a params vec in the form tokio_postgres expects.
pub(crate) fn sql_params(params: &[SqlParam]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p.as_to_sql()).collect()
}

/// Lower a pivot scope to its SELECT. Soft-deleted rows are always
/// excluded on this path.
pub(crate) fn scope_query(scope: &EventScope) -> (String, Vec<SqlParam>) {
    let mut conditions = vec!["deleted = FALSE".to_string()];
    let mut params = Vec::new();
    let mut param_idx = 1;

    conditions.push(format!("project = ${}", param_idx));
    params.push(SqlParam::String(scope.project.clone()));
    param_idx += 1;

    if let Some(root) = &scope.root {
        conditions.push(format!("root = ${}", param_idx));
        params.push(SqlParam::String(root.clone()));
        param_idx += 1;
    }

    if let Some(phase) = scope.phase {
        conditions.push(format!("phase = ${}", param_idx));
        params.push(SqlParam::String(phase.code().to_string()));
    }

    let sql = format!(
        "SELECT {} FROM {} WHERE {}",
        SELECT_COLUMNS,
        TABLE,
        conditions.join(" AND ")
    );
    (sql, params)
}

/// Lower a raw listing filter to its SELECT, newest rows first.
pub(crate) fn list_query(filter: &EventListFilter) -> (String, Vec<SqlParam>) {
    let mut conditions = Vec::new();
    let mut params = Vec::new();
    let mut param_idx = 1;

    conditions.push(format!("project = ${}", param_idx));
    params.push(SqlParam::String(filter.project.clone()));
    param_idx += 1;

    if !filter.include_deleted {
        conditions.push("deleted = FALSE".to_string());
    }

    if let Some(root) = &filter.root {
        conditions.push(format!("root = ${}", param_idx));
        params.push(SqlParam::String(root.clone()));
        param_idx += 1;
    }

    if let Some(phase) = filter.phase {
        conditions.push(format!("phase = ${}", param_idx));
        params.push(SqlParam::String(phase.code().to_string()));
        param_idx += 1;
    }

    if let Some(relation) = &filter.relation {
        conditions.push(format!("relation = ${}", param_idx));
        params.push(SqlParam::String(relation.clone()));
        param_idx += 1;
    }

    if let Some(needle) = &filter.asset_contains {
        let needle = needle.trim().to_lowercase();
        if !needle.is_empty() {
            // position() instead of LIKE so the needle needs no wildcard
            // escaping.
            conditions.push(format!("position(${} in lower(asset)) > 0", param_idx));
            params.push(SqlParam::String(needle));
        }
    }

    let mut sql = format!(
        "SELECT {} FROM {} WHERE {} ORDER BY modified_at DESC, event_id DESC",
        SELECT_COLUMNS,
        TABLE,
        conditions.join(" AND ")
    );

    if let Some(limit) = filter.limit {
        if limit >= 0 {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
    }
    let offset = filter.offset.unwrap_or(0).max(0);
    if offset > 0 {
        sql.push_str(&format!(" OFFSET {}", offset));
    }

    (sql, params)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use dailies_core::Phase;

    #[test]
    fn test_scope_query_minimal() {
        let (sql, params) = scope_query(&EventScope::project("alpha"));
        assert_eq!(
            sql,
            format!(
                "SELECT {} FROM status_event WHERE deleted = FALSE AND project = $1",
                SELECT_COLUMNS
            )
        );
        assert_eq!(params, vec![SqlParam::String("alpha".to_string())]);
    }

    #[test]
    fn test_scope_query_with_root_and_phase() {
        let mut scope = EventScope::project("alpha").with_root("chr");
        scope.phase = Some(Phase::Rig);
        let (sql, params) = scope_query(&scope);
        assert!(sql.contains("project = $1"));
        assert!(sql.contains("root = $2"));
        assert!(sql.contains("phase = $3"));
        assert_eq!(
            params,
            vec![
                SqlParam::String("alpha".to_string()),
                SqlParam::String("chr".to_string()),
                SqlParam::String("rig".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_query_orders_newest_first() {
        let (sql, _) = list_query(&EventListFilter::project("alpha"));
        assert!(sql.contains("ORDER BY modified_at DESC, event_id DESC"));
        assert!(sql.contains("deleted = FALSE"));
        assert!(!sql.contains("LIMIT"));
        assert!(!sql.contains("OFFSET"));
    }

    #[test]
    fn test_list_query_include_deleted_drops_flag_condition() {
        let mut filter = EventListFilter::project("alpha");
        filter.include_deleted = true;
        let (sql, _) = list_query(&filter);
        assert!(!sql.contains("deleted = FALSE"));
    }

    #[test]
    fn test_list_query_name_needle_is_parameterized_and_normalized() {
        let mut filter = EventListFilter::project("alpha");
        filter.asset_contains = Some("  FrEd%  ".to_string());
        let (sql, params) = list_query(&filter);
        assert!(sql.contains("position($2 in lower(asset)) > 0"));
        // The needle travels as a parameter, lowercased and trimmed, with
        // any LIKE metacharacters left inert.
        assert_eq!(
            params,
            vec![
                SqlParam::String("alpha".to_string()),
                SqlParam::String("fred%".to_string()),
            ]
        );
        assert!(!sql.contains("fred"));
    }

    #[test]
    fn test_list_query_blank_needle_is_skipped() {
        let mut filter = EventListFilter::project("alpha");
        filter.asset_contains = Some("   ".to_string());
        let (sql, params) = list_query(&filter);
        assert!(!sql.contains("position"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_list_query_paging_uses_computed_integers() {
        let mut filter = EventListFilter::project("alpha");
        filter.limit = Some(25);
        filter.offset = Some(50);
        let (sql, _) = list_query(&filter);
        assert!(sql.ends_with("LIMIT 25 OFFSET 50"));

        filter.limit = Some(-1);
        filter.offset = Some(-9);
        let (sql, _) = list_query(&filter);
        assert!(!sql.contains("LIMIT"));
        assert!(!sql.contains("OFFSET"));
    }

    #[test]
    fn test_param_count_matches_placeholders() {
        let mut filter = EventListFilter::project("alpha");
        filter.root = Some("chr".to_string());
        filter.phase = Some(Phase::Model);
        filter.relation = Some("main".to_string());
        filter.asset_contains = Some("fred".to_string());
        let (sql, params) = list_query(&filter);
        for idx in 1..=params.len() {
            assert!(sql.contains(&format!("${}", idx)), "missing ${} in {}", idx, sql);
        }
        assert!(!sql.contains(&format!("${}", params.len() + 1)));
    }
}
