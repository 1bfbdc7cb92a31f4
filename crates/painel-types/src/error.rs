use thiserror::Error;

/// Errors related to lead operations.
#[derive(Debug, Error)]
pub enum LeadError {
    #[error("lead not found")]
    NotFound,

    #[error("invalid lead: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to vendor operations.
#[derive(Debug, Error)]
pub enum VendorError {
    #[error("vendor not found")]
    NotFound,

    #[error("invalid vendor: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to product operations.
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("product not found")]
    NotFound,

    #[error("invalid product: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from the messaging provider.
#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("messaging credentials are not configured")]
    NotConfigured,

    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    #[error("provider rejected the request (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("connection failure: {0}")]
    Transport(String),

    #[error("unexpected provider response: {0}")]
    Deserialization(String),
}

/// Errors related to campaign management and dispatch.
#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("campaign not found")]
    NotFound,

    #[error("invalid campaign: {0}")]
    Validation(String),

    #[error("messaging credentials are not configured")]
    CredentialsMissing,

    #[error("campaign is already being dispatched")]
    AlreadyProcessing,

    #[error("campaign is not being dispatched")]
    NotProcessing,

    #[error("no recipients found for this campaign")]
    NoRecipients,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to the conversation viewer and dashboard.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("session not found")]
    NotFound,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from repository operations (used by trait definitions in painel-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
