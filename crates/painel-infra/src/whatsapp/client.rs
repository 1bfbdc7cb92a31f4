//! MetaCloudClient -- concrete [`MessagingProvider`] for the WhatsApp Cloud API.
//!
//! Template management needs a token and a WhatsApp Business Account id;
//! sending needs a token and a phone-number id. Missing credentials are not
//! an error at construction time: the capability checks report them and the
//! services refuse the affected operations.
//!
//! The access token is wrapped in [`SecretString`] and only exposed when
//! building the `Authorization` header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use painel_core::messaging::provider::MessagingProvider;
use painel_types::config::MessagingConfig;
use painel_types::error::MessagingError;
use painel_types::messaging::{
    MessageTemplate, OutboundBody, OutboundMessage, SendReceipt, TemplateDraft, TemplateStatus,
    TemplateSubmission,
};

use super::types::{
    CreateTemplateRequest, CreateTemplateResponse, ErrorEnvelope, HeaderExample, ImageParameter,
    LanguageCode, ListTemplatesResponse, MediaLink, SendComponent, SendMessageRequest,
    SendMessageResponse, TemplateComponent, TemplatePayload, TextPayload,
};

pub const TOKEN_ENV: &str = "META_WHATSAPP_TOKEN";
pub const WABA_ID_ENV: &str = "META_WABA_ID";
pub const PHONE_ID_ENV: &str = "META_WHATSAPP_PHONE_ID";

/// Fields requested when listing templates.
const TEMPLATE_FIELDS: &str = "name,status,category,language";
const TEMPLATE_PAGE_SIZE: &str = "50";

/// Credentials for the Graph API. Any of them may be absent.
#[derive(Default)]
pub struct MetaCredentials {
    pub token: Option<SecretString>,
    pub waba_id: Option<String>,
    pub phone_id: Option<String>,
}

impl MetaCredentials {
    /// Read credentials from the process environment. Blank values count as
    /// missing.
    pub fn from_env() -> Self {
        Self {
            token: non_empty_env(TOKEN_ENV).map(SecretString::from),
            waba_id: non_empty_env(WABA_ID_ENV),
            phone_id: non_empty_env(PHONE_ID_ENV),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// WhatsApp Cloud API client.
pub struct MetaCloudClient {
    client: reqwest::Client,
    base_url: String,
    credentials: MetaCredentials,
}

// No Debug derive: the credentials should never reach a log line.

impl MetaCloudClient {
    pub fn new(config: &MessagingConfig, credentials: MetaCredentials) -> Self {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to build HTTP client with timeout, using defaults");
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Override the Graph API root (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Token plus the given account id, or `NotConfigured`.
    fn credentials_for<'a>(
        &'a self,
        id: &'a Option<String>,
    ) -> Result<(&'a SecretString, &'a str), MessagingError> {
        match (&self.credentials.token, id.as_deref()) {
            (Some(token), Some(id)) => Ok((token, id)),
            _ => Err(MessagingError::NotConfigured),
        }
    }

    fn to_send_request(message: &OutboundMessage) -> SendMessageRequest {
        let mut request = SendMessageRequest {
            messaging_product: "whatsapp",
            to: message.to.clone(),
            kind: "text",
            text: None,
            image: None,
            template: None,
        };

        match &message.body {
            OutboundBody::Text { body } => {
                request.text = Some(TextPayload { body: body.clone() });
            }
            OutboundBody::Image { link, caption } => {
                request.kind = "image";
                request.image = Some(MediaLink {
                    link: link.clone(),
                    caption: Some(caption.clone()),
                });
            }
            OutboundBody::Template {
                name,
                language,
                header_image,
            } => {
                request.kind = "template";
                let components = header_image
                    .iter()
                    .map(|link| SendComponent {
                        kind: "header",
                        parameters: vec![ImageParameter {
                            kind: "image",
                            image: MediaLink {
                                link: link.clone(),
                                caption: None,
                            },
                        }],
                    })
                    .collect();
                request.template = Some(TemplatePayload {
                    name: name.clone(),
                    language: LanguageCode {
                        code: language.clone(),
                    },
                    components,
                });
            }
        }

        request
    }
}

fn transport_error(e: reqwest::Error) -> MessagingError {
    MessagingError::Transport(e.to_string())
}

/// Receipt for a send the API accepted.
///
/// The status already says the message was accepted, so a body that cannot
/// be read or parsed only loses the message id.
fn receipt_from_body<E: std::fmt::Display>(body: Result<String, E>) -> SendReceipt {
    let text = body.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "accepted send with unreadable body");
        String::new()
    });
    let parsed = serde_json::from_str::<SendMessageResponse>(&text).unwrap_or_default();
    SendReceipt {
        message_id: parsed.messages.into_iter().next().map(|m| m.id),
    }
}

/// Turn a non-success response into `MessagingError::Api`, using the Graph
/// error message when the body carries one.
async fn api_error(response: reqwest::Response) -> MessagingError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message)
        .unwrap_or_default();
    tracing::warn!(status, message = %message, "WhatsApp Cloud API returned an error");
    MessagingError::Api { status, message }
}

impl MessagingProvider for MetaCloudClient {
    fn name(&self) -> &str {
        "meta"
    }

    fn can_send(&self) -> bool {
        self.credentials_for(&self.credentials.phone_id).is_ok()
    }

    fn can_manage_templates(&self) -> bool {
        self.credentials_for(&self.credentials.waba_id).is_ok()
    }

    async fn submit_template(&self, draft: &TemplateDraft) -> Result<TemplateSubmission, MessagingError> {
        let (token, waba_id) = self.credentials_for(&self.credentials.waba_id)?;

        let mut components = Vec::with_capacity(2);
        if let Some(format) = draft.header {
            components.push(TemplateComponent::Header {
                format: format.to_string(),
                example: HeaderExample::default(),
            });
        }
        components.push(TemplateComponent::Body {
            text: draft.body.clone(),
        });
        let body = CreateTemplateRequest {
            name: draft.name.clone(),
            language: draft.language.clone(),
            category: draft.category.clone(),
            components,
        };

        let response = self
            .client
            .post(self.url(&format!("{waba_id}/message_templates")))
            .bearer_auth(token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let created: CreateTemplateResponse = response
            .json()
            .await
            .map_err(|e| MessagingError::Deserialization(e.to_string()))?;

        tracing::info!(template = %draft.name, id = %created.id, "template submitted for review");

        Ok(TemplateSubmission {
            id: created.id,
            name: draft.name.clone(),
            status: created
                .status
                .as_deref()
                .map(|s| s.parse().unwrap_or(TemplateStatus::Pending))
                .unwrap_or(TemplateStatus::Pending),
        })
    }

    async fn list_templates(&self) -> Result<Vec<MessageTemplate>, MessagingError> {
        let (token, waba_id) = self.credentials_for(&self.credentials.waba_id)?;

        let response = self
            .client
            .get(self.url(&format!("{waba_id}/message_templates")))
            .query(&[("fields", TEMPLATE_FIELDS), ("limit", TEMPLATE_PAGE_SIZE)])
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let listed: ListTemplatesResponse = response
            .json()
            .await
            .map_err(|e| MessagingError::Deserialization(e.to_string()))?;

        Ok(listed
            .data
            .into_iter()
            .map(|item| MessageTemplate {
                status: item.status.parse().unwrap_or(TemplateStatus::Pending),
                name: item.name,
                category: item.category,
                language: item.language,
            })
            .collect())
    }

    async fn send_message(&self, message: &OutboundMessage) -> Result<SendReceipt, MessagingError> {
        let (token, phone_id) = self.credentials_for(&self.credentials.phone_id)?;
        let body = Self::to_send_request(message);

        let response = self
            .client
            .post(self.url(&format!("{phone_id}/messages")))
            .bearer_auth(token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(receipt_from_body(response.text().await))
    }
}
