//! Graph API wire types for WhatsApp templates and messages.
//!
//! These are Meta-specific request/response structures. The provider-agnostic
//! shapes live in `painel_types::messaging`.

use serde::{Deserialize, Serialize};

/// Body of `POST /{waba_id}/message_templates`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub language: String,
    pub category: String,
    pub components: Vec<TemplateComponent>,
}

/// A component of a template definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum TemplateComponent {
    Header {
        format: String,
        example: HeaderExample,
    },
    Body {
        text: String,
    },
}

/// Sample media for a header. Left empty; the media is attached at send time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderExample {
    pub header_handle: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateResponse {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Response of `GET /{waba_id}/message_templates`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListTemplatesResponse {
    #[serde(default)]
    pub data: Vec<TemplateItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateItem {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub language: String,
}

/// Body of `POST /{phone_id}/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub messaging_product: &'static str,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplatePayload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextPayload {
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaLink {
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplatePayload {
    pub name: String,
    pub language: LanguageCode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<SendComponent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageCode {
    pub code: String,
}

/// Runtime parameters for one template component.
#[derive(Debug, Clone, Serialize)]
pub struct SendComponent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub parameters: Vec<ImageParameter>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageParameter {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub image: MediaLink,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendMessageResponse {
    #[serde(default)]
    pub messages: Vec<MessageRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageRef {
    pub id: String,
}

/// Graph API error envelope: `{"error": {"message": "...", "code": 100}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<GraphError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphError {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
}
