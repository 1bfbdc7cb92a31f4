//! Conversation summary repository trait definition.
//!
//! One summary row per finished conversation, written by the chat agent.
//! Only aggregate queries are needed for the dashboard.

use chrono::{DateTime, Utc};
use painel_types::error::RepositoryError;
use painel_types::stats::DateRange;

pub trait ConversationStatsRepository: Send + Sync {
    /// Number of conversations created within `range`.
    fn count(
        &self,
        range: &DateRange,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// Number of conversations with the given status created within `range`.
    fn count_with_status(
        &self,
        status: &str,
        range: &DateRange,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// Up to `limit` non-null durations (seconds) within `range`.
    fn durations(
        &self,
        range: &DateRange,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<i64>, RepositoryError>> + Send;

    /// Creation timestamps of conversations created at or after `since`.
    fn created_since(
        &self,
        since: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Vec<DateTime<Utc>>, RepositoryError>> + Send;
}
