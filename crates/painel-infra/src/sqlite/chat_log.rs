//! SQLite chat-log reader.
//!
//! Rows are appended by the WhatsApp agent. The `message` column holds the
//! agent's JSON message object as text.

use painel_core::repository::chat_log::ChatLogRepository;
use painel_types::chat::ChatLogEntry;
use painel_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{parse_datetime, query_error};

pub struct SqliteChatLogRepository {
    pool: DatabasePool,
}

impl SqliteChatLogRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Result<ChatLogEntry, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(query_error)?;
    let raw: String = row.try_get("message").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;

    // Malformed payloads are kept as plain strings and classified as "other".
    let message = serde_json::from_str::<serde_json::Value>(&raw).unwrap_or_else(|e| {
        tracing::debug!(id, error = %e, "chat log message is not valid JSON");
        serde_json::Value::String(raw)
    });

    Ok(ChatLogEntry {
        id,
        session_id: row.try_get("session_id").map_err(query_error)?,
        message,
        created_at: parse_datetime(&created_at)?,
    })
}

impl ChatLogRepository for SqliteChatLogRepository {
    async fn list_entries(&self) -> Result<Vec<ChatLogEntry>, RepositoryError> {
        let rows = sqlx::query("SELECT id, session_id, message, created_at FROM chat_log ORDER BY id ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.iter().map(map_row).collect()
    }

    async fn list_session_entries(&self, session_id: &str) -> Result<Vec<ChatLogEntry>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, session_id, message, created_at FROM chat_log WHERE session_id = ? ORDER BY id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(map_row).collect()
    }
}
