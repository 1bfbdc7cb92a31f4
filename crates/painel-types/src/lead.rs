use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

pub use crate::id::LeadId;

/// A lead (cliente): a contact captured by the WhatsApp chat agent or
/// registered by an operator.
///
/// Only `name` is guaranteed. Rows written by the external agent often carry
/// nothing but a name and a phone number, so every other field is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    /// Phone number as typed or captured (formatting not normalized).
    pub contact: Option<String>,
    /// CPF or CNPJ.
    pub document: Option<String>,
    pub status: LeadStatus,
    pub email: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Sales pipeline stage of a lead.
///
/// The chat agent writes free text into this column, so unknown values are
/// kept verbatim in `Other` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LeadStatus {
    New,
    Contacted,
    QuoteSent,
    Won,
    Lost,
    Active,
    Other(String),
}

impl LeadStatus {
    /// Every well-known status, in pipeline order.
    pub const KNOWN: [LeadStatus; 6] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::QuoteSent,
        LeadStatus::Won,
        LeadStatus::Lost,
        LeadStatus::Active,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            LeadStatus::New => "novo",
            LeadStatus::Contacted => "contatado",
            LeadStatus::QuoteSent => "cotacao_enviada",
            LeadStatus::Won => "venda_fechada",
            LeadStatus::Lost => "perdido",
            LeadStatus::Active => "ativo",
            LeadStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for LeadStatus {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "novo" => LeadStatus::New,
            "contatado" => LeadStatus::Contacted,
            "cotacao_enviada" => LeadStatus::QuoteSent,
            "venda_fechada" => LeadStatus::Won,
            "perdido" => LeadStatus::Lost,
            "ativo" => LeadStatus::Active,
            _ => LeadStatus::Other(s),
        }
    }
}

impl From<LeadStatus> for String {
    fn from(status: LeadStatus) -> Self {
        match status {
            LeadStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("lead status cannot be empty".to_string());
        }
        Ok(LeadStatus::from(s.to_string()))
    }
}

impl Default for LeadStatus {
    fn default() -> Self {
        LeadStatus::New
    }
}

/// Request to register a lead. `name` and `contact` are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLeadRequest {
    pub name: String,
    pub contact: String,
    pub status: Option<LeadStatus>,
    pub document: Option<String>,
    pub email: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

/// Request to edit a lead.
///
/// Name and contact are always resubmitted and both required, like the
/// registration form. Optional fields are replaced only when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLeadRequest {
    pub name: String,
    pub contact: String,
    pub status: Option<LeadStatus>,
    pub document: Option<String>,
    pub email: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}
