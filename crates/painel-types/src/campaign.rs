use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

pub use crate::id::{CampaignId, SendId};
use crate::id::{LeadId, VendorId};

/// A bulk WhatsApp message job (campanha) targeting every lead or every vendor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    /// Text body, or image caption when `image_url` is set.
    pub message: String,
    /// Public URL of an image sent with the message.
    pub image_url: Option<String>,
    /// Approved provider template to send instead of free-form text.
    pub template_name: Option<String>,
    pub audience: Audience,
    pub status: CampaignStatus,
    /// Audience size when the campaign was created.
    pub total_targets: i64,
    pub sent: i64,
    pub failed: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// What kind of message the dispatch loop sends for this campaign.
    pub fn content(&self) -> CampaignContent<'_> {
        match (&self.template_name, &self.image_url) {
            (Some(template), image) => CampaignContent::Template {
                name: template,
                header_image: image.as_deref(),
            },
            (None, Some(link)) => CampaignContent::Image {
                link,
                caption: &self.message,
            },
            (None, None) => CampaignContent::Text {
                body: &self.message,
            },
        }
    }
}

/// Payload shape derived from a campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampaignContent<'a> {
    Text { body: &'a str },
    Image { link: &'a str, caption: &'a str },
    Template { name: &'a str, header_image: Option<&'a str> },
}

/// Who receives a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Audience {
    #[serde(rename = "leads")]
    Leads,
    #[serde(rename = "vendedores")]
    Vendors,
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Audience::Leads => write!(f, "leads"),
            Audience::Vendors => write!(f, "vendedores"),
        }
    }
}

impl FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "leads" => Ok(Audience::Leads),
            "vendedores" | "vendors" => Ok(Audience::Vendors),
            other => Err(format!("invalid audience: '{other}'")),
        }
    }
}

/// Campaign lifecycle.
///
/// - Draft: created, never sent
/// - Processing: dispatch loop running
/// - Completed: dispatch loop finished (counters are final)
/// - Paused: held by an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignStatus {
    #[serde(rename = "rascunho")]
    Draft,
    #[serde(rename = "processando")]
    Processing,
    #[serde(rename = "concluida")]
    Completed,
    #[serde(rename = "pausada")]
    Paused,
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CampaignStatus::Draft => write!(f, "rascunho"),
            CampaignStatus::Processing => write!(f, "processando"),
            CampaignStatus::Completed => write!(f, "concluida"),
            CampaignStatus::Paused => write!(f, "pausada"),
        }
    }
}

impl FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rascunho" => Ok(CampaignStatus::Draft),
            "processando" => Ok(CampaignStatus::Processing),
            "concluida" => Ok(CampaignStatus::Completed),
            "pausada" => Ok(CampaignStatus::Paused),
            other => Err(format!("invalid campaign status: '{other}'")),
        }
    }
}

impl Default for CampaignStatus {
    fn default() -> Self {
        CampaignStatus::Draft
    }
}

/// The record a send row points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Recipient {
    Lead(LeadId),
    Vendor(VendorId),
}

impl Recipient {
    pub fn uuid(&self) -> uuid::Uuid {
        match self {
            Recipient::Lead(id) => id.0,
            Recipient::Vendor(id) => id.0,
        }
    }
}

/// One recipient of a campaign as loaded by the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTarget {
    pub recipient: Recipient,
    pub phone: Option<String>,
}

/// Delivery state of a single send record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendStatus {
    #[serde(rename = "pendente")]
    Pending,
    #[serde(rename = "enviado")]
    Sent,
    #[serde(rename = "erro")]
    Failed,
}

impl fmt::Display for SendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendStatus::Pending => write!(f, "pendente"),
            SendStatus::Sent => write!(f, "enviado"),
            SendStatus::Failed => write!(f, "erro"),
        }
    }
}

impl FromStr for SendStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pendente" => Ok(SendStatus::Pending),
            "enviado" => Ok(SendStatus::Sent),
            "erro" => Ok(SendStatus::Failed),
            other => Err(format!("invalid send status: '{other}'")),
        }
    }
}

/// Per-recipient send record (campanhas_envios).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignSend {
    pub id: SendId,
    pub campaign_id: CampaignId,
    pub recipient: Recipient,
    pub status: SendStatus,
    pub error_message: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl CampaignSend {
    /// A fresh `pendente` record for `recipient`.
    pub fn pending(campaign_id: CampaignId, recipient: Recipient) -> Self {
        Self {
            id: SendId::new(),
            campaign_id,
            recipient,
            status: SendStatus::Pending,
            error_message: None,
            sent_at: None,
            created_at: Utc::now(),
        }
    }
}

/// Outcome of a single send attempt, written back to the send record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent { at: DateTime<Utc> },
    Failed { reason: String },
}

/// Final counters of a dispatch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub sent: i64,
    pub failed: i64,
}

/// Request to create a free-form (text or image) campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCampaignRequest {
    pub name: String,
    pub message: String,
    pub audience: Audience,
    pub image_url: Option<String>,
}

/// Request to create a campaign that sends an approved provider template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTemplateCampaignRequest {
    pub name: String,
    pub template_name: String,
    pub audience: Audience,
    /// Public URL of a header image, for templates with an IMAGE header.
    pub header_image_url: Option<String>,
    /// Optional note stored as the campaign message; defaults to the template name.
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign(image_url: Option<&str>, template_name: Option<&str>) -> Campaign {
        let now = Utc::now();
        Campaign {
            id: CampaignId::new(),
            name: "Promo".to_string(),
            message: "Olá!".to_string(),
            image_url: image_url.map(String::from),
            template_name: template_name.map(String::from),
            audience: Audience::Leads,
            status: CampaignStatus::Draft,
            total_targets: 0,
            sent: 0,
            failed: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_content_text() {
        let c = campaign(None, None);
        assert_eq!(c.content(), CampaignContent::Text { body: "Olá!" });
    }

    #[test]
    fn test_content_image_uses_message_as_caption() {
        let c = campaign(Some("https://cdn/x.png"), None);
        assert_eq!(
            c.content(),
            CampaignContent::Image {
                link: "https://cdn/x.png",
                caption: "Olá!"
            }
        );
    }

    #[test]
    fn test_content_template_takes_precedence() {
        let c = campaign(Some("https://cdn/x.png"), Some("promo_natal"));
        assert_eq!(
            c.content(),
            CampaignContent::Template {
                name: "promo_natal",
                header_image: Some("https://cdn/x.png")
            }
        );
    }

    #[test]
    fn test_audience_parse() {
        assert_eq!("leads".parse::<Audience>().unwrap(), Audience::Leads);
        assert_eq!("vendedores".parse::<Audience>().unwrap(), Audience::Vendors);
        assert_eq!("Vendors".parse::<Audience>().unwrap(), Audience::Vendors);
        assert!("todos".parse::<Audience>().is_err());
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&CampaignStatus::Processing).unwrap(),
            "\"processando\""
        );
        assert_eq!("concluida".parse::<CampaignStatus>().unwrap(), CampaignStatus::Completed);
        assert_eq!(SendStatus::Failed.to_string(), "erro");
    }

    #[test]
    fn test_recipient_serde() {
        let id = LeadId::new();
        let json = serde_json::to_value(Recipient::Lead(id)).unwrap();
        assert_eq!(json["kind"], "lead");
        assert_eq!(json["id"], id.to_string());
    }
}
