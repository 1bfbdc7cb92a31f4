//! Template submission rules.

use painel_types::error::MessagingError;
use painel_types::messaging::{SubmitTemplateRequest, TemplateDraft, sanitize_template_name};

/// Every template this backend submits is a marketing template.
pub const TEMPLATE_CATEGORY: &str = "MARKETING";

/// Validate operator input and turn it into a submittable draft.
///
/// The name is sanitized to the provider's `[a-z0-9_]` alphabet; a name
/// with nothing left, or an empty body, is rejected.
pub fn build_draft(
    request: SubmitTemplateRequest,
    language: &str,
) -> Result<TemplateDraft, MessagingError> {
    let name = sanitize_template_name(request.name.trim());
    if name.is_empty() {
        return Err(MessagingError::InvalidTemplate(
            "name must contain at least one letter or digit".to_string(),
        ));
    }
    let body = request.body.trim().to_string();
    if body.is_empty() {
        return Err(MessagingError::InvalidTemplate("body cannot be empty".to_string()));
    }

    Ok(TemplateDraft {
        name,
        body,
        header: request.header,
        language: language.to_string(),
        category: TEMPLATE_CATEGORY.to_string(),
    })
}
