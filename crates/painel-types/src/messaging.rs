//! Messaging-provider domain types: message templates and outbound messages.
//!
//! These are provider-agnostic. The Meta WhatsApp Cloud wire format lives in
//! `painel-infra`.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Template language used for every submission and template send.
pub const DEFAULT_TEMPLATE_LANGUAGE: &str = "pt_BR";

/// A message template registered with the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub name: String,
    pub status: TemplateStatus,
    pub category: String,
    pub language: String,
}

/// Review state of a template at the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TemplateStatus {
    Approved,
    Pending,
    Rejected,
    Paused,
    Disabled,
}

impl TemplateStatus {
    pub fn is_approved(&self) -> bool {
        matches!(self, TemplateStatus::Approved)
    }
}

impl fmt::Display for TemplateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateStatus::Approved => write!(f, "APPROVED"),
            TemplateStatus::Pending => write!(f, "PENDING"),
            TemplateStatus::Rejected => write!(f, "REJECTED"),
            TemplateStatus::Paused => write!(f, "PAUSED"),
            TemplateStatus::Disabled => write!(f, "DISABLED"),
        }
    }
}

impl FromStr for TemplateStatus {
    type Err = std::convert::Infallible;

    /// Unknown review states (IN_APPEAL, PENDING_DELETION, ...) read as pending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_uppercase().as_str() {
            "APPROVED" => TemplateStatus::Approved,
            "REJECTED" => TemplateStatus::Rejected,
            "PAUSED" => TemplateStatus::Paused,
            "DISABLED" => TemplateStatus::Disabled,
            _ => TemplateStatus::Pending,
        })
    }
}

/// Media kind of an optional template header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HeaderFormat {
    Image,
    Document,
}

impl fmt::Display for HeaderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderFormat::Image => write!(f, "IMAGE"),
            HeaderFormat::Document => write!(f, "DOCUMENT"),
        }
    }
}

impl FromStr for HeaderFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "IMAGE" => Ok(HeaderFormat::Image),
            "DOCUMENT" => Ok(HeaderFormat::Document),
            other => Err(format!("invalid header format: '{other}'")),
        }
    }
}

/// Operator input for a new template, before sanitization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTemplateRequest {
    pub name: String,
    pub body: String,
    pub header: Option<HeaderFormat>,
}

/// A validated template ready to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateDraft {
    /// Sanitized name (`[a-z0-9_]+`).
    pub name: String,
    pub body: String,
    pub header: Option<HeaderFormat>,
    pub language: String,
    pub category: String,
}

/// Provider acknowledgement of a template submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSubmission {
    pub id: String,
    pub name: String,
    pub status: TemplateStatus,
}

/// Templates split by usability for dispatch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateCatalog {
    pub approved: Vec<MessageTemplate>,
    pub pending: Vec<MessageTemplate>,
}

impl TemplateCatalog {
    pub fn from_templates(templates: Vec<MessageTemplate>) -> Self {
        let (approved, pending) = templates.into_iter().partition(|t| t.status.is_approved());
        Self { approved, pending }
    }
}

/// A single message to one phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    /// Digits only, country code included.
    pub to: String,
    pub body: OutboundBody,
}

/// Content of an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundBody {
    Text {
        body: String,
    },
    Image {
        link: String,
        caption: String,
    },
    Template {
        name: String,
        language: String,
        header_image: Option<String>,
    },
}

/// Provider acknowledgement of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub message_id: Option<String>,
}

/// Normalize an operator-typed template name into the provider's format.
///
/// Lowercases, turns whitespace runs into a single `_`, then drops every
/// character outside `[a-z0-9_]`.
///
/// ```
/// use painel_types::messaging::sanitize_template_name;
///
/// assert_eq!(sanitize_template_name("Promoção de Natal"), "promoo_de_natal");
/// assert_eq!(sanitize_template_name("  Oferta   Semanal! "), "_oferta_semanal_");
/// ```
pub fn sanitize_template_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut result = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                result.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            result.push(c);
        }
    }
    result
}
