//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use painel_types::error::RepositoryError;

pub mod audience;
pub mod campaign;
pub mod chat_log;
pub mod conversation;
pub mod lead;
pub mod pool;
pub mod product;
pub mod vendor;

/// Parse a stored timestamp.
///
/// Rows written by this service are RFC 3339; rows written by the chat
/// agent may use SQLite's `YYYY-MM-DD HH:MM:SS` form, read as UTC.
pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| RepositoryError::Query(format!("invalid datetime '{s}': {e}")))
}

/// Fixed-width UTC form so that text comparison orders chronologically.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn query_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

/// `%term%` pattern for a case-insensitive `LIKE`, with wildcards escaped.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Append `LIMIT`/`OFFSET`. SQLite needs a limit before an offset, so a
/// bare offset gets `LIMIT -1`.
pub(crate) fn push_pagination(sql: &mut String, limit: Option<i64>, offset: Option<i64>) {
    match (limit, offset) {
        (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
        (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
        (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
        (None, None) => {}
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::pool::DatabasePool;

    pub async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }
}
