//! Conversation-history viewer.
//!
//! Groups the chat agent's raw log into per-customer sessions, infers
//! whether the agent handed the customer over to a human, and attaches the
//! lead name when a lead's contact matches the session phone.

use std::collections::HashMap;

use painel_types::chat::{
    ChatLogEntry, MessageKind, SessionDetail, SessionStatus, SessionSummary, TranscriptMessage,
};
use painel_types::error::{ConversationError, RepositoryError};
use painel_types::lead::Lead;
use painel_types::phone::{phone_from_session_id, phones_match};

use crate::repository::SortOrder;
use crate::repository::chat_log::ChatLogRepository;
use crate::repository::lead::{LeadFilter, LeadRepository};

/// Words in an agent reply that signal a handover.
pub const TRANSFER_KEYWORDS: [&str; 7] = [
    "transferindo",
    "atendente",
    "humano",
    "setor",
    "financeiro",
    "comercial",
    "compras",
];

/// Messages kept in a session preview.
pub const PREVIEW_LEN: usize = 6;

fn storage(e: RepositoryError) -> ConversationError {
    ConversationError::StorageError(e.to_string())
}

/// Whether an agent reply hands the customer over.
pub fn is_transfer_message(content: &str) -> bool {
    let lowered = content.to_lowercase();
    TRANSFER_KEYWORDS.iter().any(|k| lowered.contains(k))
}

/// Summarize one session. `entries` must be non-empty and in id order.
fn summarize(session_id: &str, entries: &[ChatLogEntry]) -> Option<SessionSummary> {
    let first = entries.first()?;
    let last = entries.last()?;

    let transcript: Vec<TranscriptMessage> = entries.iter().map(ChatLogEntry::to_transcript).collect();

    let last_of = |kind: MessageKind| {
        transcript
            .iter()
            .rev()
            .find(|m| m.kind == kind)
            .map(|m| m.content.clone())
            .unwrap_or_default()
    };

    let transferred = transcript
        .iter()
        .any(|m| m.kind == MessageKind::Ai && is_transfer_message(&m.content));

    let preview_start = transcript.len().saturating_sub(PREVIEW_LEN);

    Some(SessionSummary {
        session_id: session_id.to_string(),
        phone: phone_from_session_id(session_id),
        lead_name: None,
        first_message_at: first.created_at,
        last_message_at: last.created_at,
        message_count: transcript.len(),
        last_human_message: last_of(MessageKind::Human),
        last_ai_message: last_of(MessageKind::Ai),
        status: if transferred {
            SessionStatus::Transferred
        } else {
            SessionStatus::Resolved
        },
        last_messages: transcript[preview_start..].to_vec(),
    })
}

/// Name of the first lead whose contact matches `phone`.
///
/// `leads` must be oldest first, so the earliest registered lead wins.
fn match_lead_name(phone: &str, leads: &[Lead]) -> Option<String> {
    leads
        .iter()
        .filter(|l| !l.name.trim().is_empty())
        .find(|l| l.contact.as_deref().is_some_and(|c| phones_match(phone, c)))
        .map(|l| l.name.clone())
}

/// Read-only view over the chat log.
pub struct ConversationService<Ch: ChatLogRepository, L: LeadRepository> {
    chat_log: Ch,
    leads: L,
}

impl<Ch: ChatLogRepository, L: LeadRepository> ConversationService<Ch, L> {
    pub fn new(chat_log: Ch, leads: L) -> Self {
        Self { chat_log, leads }
    }

    async fn leads_oldest_first(&self) -> Result<Vec<Lead>, ConversationError> {
        let filter = LeadFilter {
            sort_order: Some(SortOrder::Asc),
            ..Default::default()
        };
        self.leads.list(Some(filter)).await.map_err(storage)
    }

    /// Every session, most recently active first.
    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>, ConversationError> {
        let entries = self.chat_log.list_entries().await.map_err(storage)?;

        // Keep first-seen order so ties on timestamps stay stable.
        let mut order: Vec<String> = Vec::new();
        let mut grouped: HashMap<String, Vec<ChatLogEntry>> = HashMap::new();
        for entry in entries {
            if entry.session_id.trim().is_empty() {
                continue;
            }
            let bucket = grouped.entry(entry.session_id.clone()).or_insert_with(|| {
                order.push(entry.session_id.clone());
                Vec::new()
            });
            bucket.push(entry);
        }

        let mut sessions: Vec<SessionSummary> = order
            .iter()
            .filter_map(|id| summarize(id, grouped.get(id)?))
            .collect();
        sessions.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));

        let leads = self.leads_oldest_first().await?;
        for session in &mut sessions {
            session.lead_name = match_lead_name(&session.phone, &leads);
        }

        tracing::debug!(sessions = sessions.len(), "chat sessions loaded");
        Ok(sessions)
    }

    /// One session with its full transcript.
    pub async fn get_session(&self, session_id: &str) -> Result<SessionDetail, ConversationError> {
        let entries = self
            .chat_log
            .list_session_entries(session_id)
            .await
            .map_err(storage)?;
        let mut summary = summarize(session_id, &entries).ok_or(ConversationError::NotFound)?;

        let leads = self.leads_oldest_first().await?;
        summary.lead_name = match_lead_name(&summary.phone, &leads);

        let messages = entries.iter().map(ChatLogEntry::to_transcript).collect();
        Ok(SessionDetail { summary, messages })
    }
}
