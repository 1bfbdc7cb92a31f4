//! MessagingProvider trait definition.

use painel_types::error::MessagingError;
use painel_types::messaging::{
    MessageTemplate, OutboundMessage, SendReceipt, TemplateDraft, TemplateSubmission,
};

/// A third-party messaging API able to register templates and send messages.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait MessagingProvider: Send + Sync {
    /// Provider name for logs ("meta", "mock", ...).
    fn name(&self) -> &str;

    /// Whether credentials for sending messages are present.
    fn can_send(&self) -> bool;

    /// Whether credentials for template management are present.
    fn can_manage_templates(&self) -> bool;

    /// Submit a template for review.
    fn submit_template(
        &self,
        draft: &TemplateDraft,
    ) -> impl std::future::Future<Output = Result<TemplateSubmission, MessagingError>> + Send;

    /// Registered templates (at most one page of 50).
    fn list_templates(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<MessageTemplate>, MessagingError>> + Send;

    /// Send one message.
    fn send_message(
        &self,
        message: &OutboundMessage,
    ) -> impl std::future::Future<Output = Result<SendReceipt, MessagingError>> + Send;
}

/// Shared providers: one client can back several services.
impl<T: MessagingProvider> MessagingProvider for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn can_send(&self) -> bool {
        (**self).can_send()
    }

    fn can_manage_templates(&self) -> bool {
        (**self).can_manage_templates()
    }

    fn submit_template(
        &self,
        draft: &TemplateDraft,
    ) -> impl std::future::Future<Output = Result<TemplateSubmission, MessagingError>> + Send {
        (**self).submit_template(draft)
    }

    fn list_templates(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<MessageTemplate>, MessagingError>> + Send {
        (**self).list_templates()
    }

    fn send_message(
        &self,
        message: &OutboundMessage,
    ) -> impl std::future::Future<Output = Result<SendReceipt, MessagingError>> + Send {
        (**self).send_message(message)
    }
}
