//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use painel_types::error::{
    CampaignError, ConversationError, LeadError, MessagingError, ProductError, VendorError,
};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Lead(LeadError),
    Vendor(VendorError),
    Product(ProductError),
    Campaign(CampaignError),
    Messaging(MessagingError),
    Conversation(ConversationError),
    /// Authentication failure.
    Unauthorized(String),
    /// Malformed input caught before reaching a service.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<LeadError> for AppError {
    fn from(e: LeadError) -> Self {
        AppError::Lead(e)
    }
}

impl From<VendorError> for AppError {
    fn from(e: VendorError) -> Self {
        AppError::Vendor(e)
    }
}

impl From<ProductError> for AppError {
    fn from(e: ProductError) -> Self {
        AppError::Product(e)
    }
}

impl From<CampaignError> for AppError {
    fn from(e: CampaignError) -> Self {
        AppError::Campaign(e)
    }
}

impl From<MessagingError> for AppError {
    fn from(e: MessagingError) -> Self {
        AppError::Messaging(e)
    }
}

impl From<ConversationError> for AppError {
    fn from(e: ConversationError) -> Self {
        AppError::Conversation(e)
    }
}

fn messaging_parts(e: &MessagingError) -> (StatusCode, &'static str, String) {
    match e {
        MessagingError::NotConfigured => (
            StatusCode::SERVICE_UNAVAILABLE,
            "MESSAGING_NOT_CONFIGURED",
            "WhatsApp credentials are not configured".to_string(),
        ),
        MessagingError::InvalidTemplate(msg) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        MessagingError::Api { message, .. } if !message.is_empty() => {
            (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", message.clone())
        }
        other => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", other.to_string()),
    }
}

impl AppError {
    /// Status code, machine-readable code and message for this error.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Lead(LeadError::NotFound) => {
                (StatusCode::NOT_FOUND, "LEAD_NOT_FOUND", "Lead not found".to_string())
            }
            AppError::Lead(LeadError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Lead(e) => (StatusCode::INTERNAL_SERVER_ERROR, "LEAD_ERROR", e.to_string()),
            AppError::Vendor(VendorError::NotFound) => {
                (StatusCode::NOT_FOUND, "VENDOR_NOT_FOUND", "Vendor not found".to_string())
            }
            AppError::Vendor(VendorError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Vendor(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "VENDOR_ERROR", e.to_string())
            }
            AppError::Product(ProductError::NotFound) => {
                (StatusCode::NOT_FOUND, "PRODUCT_NOT_FOUND", "Product not found".to_string())
            }
            AppError::Product(ProductError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Product(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PRODUCT_ERROR", e.to_string())
            }
            AppError::Campaign(CampaignError::NotFound) => {
                (StatusCode::NOT_FOUND, "CAMPAIGN_NOT_FOUND", "Campaign not found".to_string())
            }
            AppError::Campaign(CampaignError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Campaign(CampaignError::CredentialsMissing) => {
                messaging_parts(&MessagingError::NotConfigured)
            }
            AppError::Campaign(CampaignError::AlreadyProcessing) => (
                StatusCode::CONFLICT,
                "CAMPAIGN_PROCESSING",
                "Campaign is already being dispatched".to_string(),
            ),
            AppError::Campaign(CampaignError::NotProcessing) => (
                StatusCode::CONFLICT,
                "CAMPAIGN_NOT_PROCESSING",
                "Campaign is not being dispatched".to_string(),
            ),
            AppError::Campaign(CampaignError::NoRecipients) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_RECIPIENTS",
                "No recipients found for this campaign".to_string(),
            ),
            AppError::Campaign(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CAMPAIGN_ERROR", e.to_string())
            }
            AppError::Messaging(e) => messaging_parts(e),
            AppError::Conversation(ConversationError::NotFound) => {
                (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", "Session not found".to_string())
            }
            AppError::Conversation(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONVERSATION_ERROR", e.to_string())
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, message = %message, "request failed");
        }

        let body = ApiResponse::error(code, &message, uuid::Uuid::now_v7().to_string(), 0);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let (status, code, _) = AppError::from(LeadError::NotFound).parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "LEAD_NOT_FOUND");

        let (status, code, _) = AppError::from(ConversationError::NotFound).parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "SESSION_NOT_FOUND");
    }

    #[test]
    fn test_campaign_refusals() {
        let (status, _, _) = AppError::from(CampaignError::AlreadyProcessing).parts();
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, code, _) = AppError::from(CampaignError::CredentialsMissing).parts();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "MESSAGING_NOT_CONFIGURED");

        let (status, _, _) = AppError::from(CampaignError::NoRecipients).parts();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, code, _) = AppError::from(CampaignError::NotProcessing).parts();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "CAMPAIGN_NOT_PROCESSING");
    }

    #[test]
    fn test_provider_message_is_surfaced() {
        let err = AppError::from(MessagingError::Api {
            status: 400,
            message: "Template name already exists".to_string(),
        });
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "PROVIDER_ERROR");
        assert_eq!(message, "Template name already exists");
    }

    #[test]
    fn test_validation_maps_to_400() {
        let (status, code, message) =
            AppError::from(VendorError::Validation("name is required".to_string())).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
        assert_eq!(message, "name is required");
    }
}
