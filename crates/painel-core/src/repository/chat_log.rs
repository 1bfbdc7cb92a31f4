//! Chat-log repository trait definition (read-only).
//!
//! The chat log is written by the external WhatsApp agent; this service
//! never inserts into it.

use painel_types::chat::ChatLogEntry;
use painel_types::error::RepositoryError;

pub trait ChatLogRepository: Send + Sync {
    /// Every entry, ascending by row id.
    fn list_entries(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ChatLogEntry>, RepositoryError>> + Send;

    /// Entries of one session, ascending by row id.
    fn list_session_entries(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ChatLogEntry>, RepositoryError>> + Send;
}
