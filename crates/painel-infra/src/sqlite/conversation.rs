//! SQLite conversation summary queries for the dashboard.
//!
//! Range bounds compare through `julianday()` because rows written by the
//! chat agent may not use the same timestamp layout as this service.

use chrono::{DateTime, Utc};
use painel_core::repository::conversation::ConversationStatsRepository;
use painel_types::error::RepositoryError;
use painel_types::stats::DateRange;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// `WHERE` fragments and bind values for a creation-time range.
fn range_conditions(range: &DateRange) -> (Vec<&'static str>, Vec<String>) {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();
    if let Some(start) = range.start {
        conditions.push("julianday(created_at) >= julianday(?)");
        binds.push(format_datetime(&start));
    }
    if let Some(end) = range.end {
        conditions.push("julianday(created_at) <= julianday(?)");
        binds.push(format_datetime(&end));
    }
    (conditions, binds)
}

fn push_where(sql: &mut String, conditions: &[&str]) {
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
}

impl ConversationStatsRepository for SqliteConversationRepository {
    async fn count(&self, range: &DateRange) -> Result<i64, RepositoryError> {
        let (conditions, binds) = range_conditions(range);
        let mut sql = String::from("SELECT COUNT(*) FROM conversations");
        push_where(&mut sql, &conditions);

        let mut query = sqlx::query_as::<_, (i64,)>(&sql);
        for value in &binds {
            query = query.bind(value);
        }
        let (count,) = query
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_error)?;
        Ok(count)
    }

    async fn count_with_status(&self, status: &str, range: &DateRange) -> Result<i64, RepositoryError> {
        let (mut conditions, range_binds) = range_conditions(range);
        conditions.insert(0, "status = ?");
        let mut sql = String::from("SELECT COUNT(*) FROM conversations");
        push_where(&mut sql, &conditions);

        let mut query = sqlx::query_as::<_, (i64,)>(&sql).bind(status);
        for value in &range_binds {
            query = query.bind(value);
        }
        let (count,) = query
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_error)?;
        Ok(count)
    }

    async fn durations(&self, range: &DateRange, limit: i64) -> Result<Vec<i64>, RepositoryError> {
        let (mut conditions, binds) = range_conditions(range);
        conditions.insert(0, "duration_seconds IS NOT NULL");
        let mut sql = String::from("SELECT duration_seconds FROM conversations");
        push_where(&mut sql, &conditions);
        sql.push_str(" ORDER BY julianday(created_at) DESC LIMIT ?");

        let mut query = sqlx::query_as::<_, (i64,)>(&sql);
        for value in &binds {
            query = query.bind(value);
        }
        let rows = query
            .bind(limit)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;
        Ok(rows.into_iter().map(|(d,)| d).collect())
    }

    async fn created_since(&self, since: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>, RepositoryError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT created_at FROM conversations WHERE julianday(created_at) >= julianday(?) ORDER BY julianday(created_at) ASC",
        )
        .bind(format_datetime(&since))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(|(at,)| parse_datetime(at)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::test_pool;
    use chrono::TimeZone;

    async fn insert(pool: &DatabasePool, status: &str, duration: Option<i64>, created_at: &str) {
        sqlx::query(
            "INSERT INTO conversations (id, status, duration_seconds, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(uuid::Uuid::now_v7().to_string())
        .bind(status)
        .bind(duration)
        .bind(created_at)
        .execute(&pool.writer)
        .await
        .unwrap();
    }

    async fn seeded() -> SqliteConversationRepository {
        let pool = test_pool().await;
        insert(&pool, "resolvida_bot", Some(120), "2026-03-01 09:15:00").await;
        insert(&pool, "transferido", Some(300), "2026-03-01T14:40:00.000Z").await;
        insert(&pool, "resolvida_bot", None, "2026-03-02T08:00:00.000Z").await;
        insert(&pool, "resolvida_bot", Some(60), "2026-02-27 23:59:59").await;
        SqliteConversationRepository::new(pool)
    }

    fn march_first() -> DateRange {
        DateRange {
            start: Some(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()),
            end: Some(Utc.with_ymd_and_hms(2026, 3, 1, 23, 59, 59).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_counts_with_mixed_timestamp_layouts() {
        let repo = seeded().await;

        assert_eq!(repo.count(&DateRange::default()).await.unwrap(), 4);
        assert_eq!(repo.count(&march_first()).await.unwrap(), 2);
        assert_eq!(
            repo.count_with_status("resolvida_bot", &march_first()).await.unwrap(),
            1
        );
        assert_eq!(
            repo.count_with_status("resolvida_bot", &DateRange::default()).await.unwrap(),
            3
        );
    }

    #[tokio::test]
    async fn test_durations_skip_nulls_and_respect_limit() {
        let repo = seeded().await;

        let mut all = repo.durations(&DateRange::default(), 100).await.unwrap();
        all.sort();
        assert_eq!(all, vec![60, 120, 300]);

        let limited = repo.durations(&DateRange::default(), 1).await.unwrap();
        assert_eq!(limited, vec![300]);

        let mut day = repo.durations(&march_first(), 100).await.unwrap();
        day.sort();
        assert_eq!(day, vec![120, 300]);
    }

    #[tokio::test]
    async fn test_created_since() {
        let repo = seeded().await;
        let since = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

        let times = repo.created_since(since).await.unwrap();
        assert_eq!(
            times,
            vec![
                Utc.with_ymd_and_hms(2026, 3, 1, 14, 40, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap(),
            ]
        );
    }
}
