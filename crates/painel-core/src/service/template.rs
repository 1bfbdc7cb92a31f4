//! Message template service.

use painel_types::error::MessagingError;
use painel_types::messaging::{
    MessageTemplate, SubmitTemplateRequest, TemplateCatalog, TemplateSubmission,
};

use crate::messaging::provider::MessagingProvider;
use crate::messaging::template::build_draft;

/// Registers templates with the provider and lists the ones it knows.
pub struct TemplateService<M: MessagingProvider> {
    provider: M,
    language: String,
}

impl<M: MessagingProvider> TemplateService<M> {
    pub fn new(provider: M, language: impl Into<String>) -> Self {
        Self {
            provider,
            language: language.into(),
        }
    }

    /// Validate and submit a new template for review.
    pub async fn submit_template(
        &self,
        request: SubmitTemplateRequest,
    ) -> Result<TemplateSubmission, MessagingError> {
        if !self.provider.can_manage_templates() {
            return Err(MessagingError::NotConfigured);
        }
        let draft = build_draft(request, &self.language)?;
        let submission = self.provider.submit_template(&draft).await?;
        tracing::info!(
            template = %submission.name,
            status = %submission.status,
            "template submitted"
        );
        Ok(submission)
    }

    pub async fn list_templates(&self) -> Result<Vec<MessageTemplate>, MessagingError> {
        if !self.provider.can_manage_templates() {
            return Err(MessagingError::NotConfigured);
        }
        self.provider.list_templates().await
    }

    /// Templates split into approved (usable for dispatch) and the rest.
    pub async fn catalog(&self) -> Result<TemplateCatalog, MessagingError> {
        Ok(TemplateCatalog::from_templates(self.list_templates().await?))
    }
}
