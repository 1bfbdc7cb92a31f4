//! Chat transcript types for the conversation-history viewer.
//!
//! The WhatsApp agent appends one row per message to a chat-log table, keyed
//! by a session id derived from the customer's WhatsApp JID. The admin
//! backend only reads these rows and groups them into sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

/// One raw row of the chat log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatLogEntry {
    /// Monotonic row id assigned by the store; defines transcript order.
    pub id: i64,
    pub session_id: String,
    /// Agent-framework message object, typically `{"type": "human"|"ai", "content": "..."}`.
    pub message: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl ChatLogEntry {
    /// Speaker of this entry.
    pub fn kind(&self) -> MessageKind {
        MessageKind::from_wire(self.message.get("type").and_then(|v| v.as_str()).unwrap_or(""))
    }

    /// Text content, empty when the message object has none.
    pub fn content(&self) -> &str {
        self.message
            .get("content")
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }

    pub fn to_transcript(&self) -> TranscriptMessage {
        TranscriptMessage {
            kind: self.kind(),
            content: self.content().to_string(),
            created_at: self.created_at,
        }
    }
}

/// Who produced a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Human,
    Ai,
    /// Tool calls, system prompts and anything else the agent stores.
    Other,
}

impl MessageKind {
    pub fn from_wire(s: &str) -> Self {
        match s {
            "human" => MessageKind::Human,
            "ai" => MessageKind::Ai,
            _ => MessageKind::Other,
        }
    }
}

/// A message as shown in a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub kind: MessageKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a chat session as inferred from the agent's replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Still being classified (no messages seen yet).
    Active,
    /// The agent handed the customer over to a human or a department.
    Transferred,
    /// The agent handled the session alone.
    Resolved,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Transferred => write!(f, "transferred"),
            SessionStatus::Resolved => write!(f, "resolved"),
        }
    }
}

/// Summary of one chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub phone: String,
    /// Name of the lead whose contact matches `phone`, if any.
    pub lead_name: Option<String>,
    pub first_message_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
    pub message_count: usize,
    pub last_human_message: String,
    pub last_ai_message: String,
    pub status: SessionStatus,
    /// The last few messages, oldest first.
    pub last_messages: Vec<TranscriptMessage>,
}

/// A session summary together with its full transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetail {
    pub summary: SessionSummary,
    pub messages: Vec<TranscriptMessage>,
}
