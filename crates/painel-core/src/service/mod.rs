//! Business services.
//!
//! Each service is generic over the repository and provider traits it needs,
//! so painel-core never depends on painel-infra.

pub mod campaign;
pub mod conversation;
pub mod dashboard;
pub mod lead;
pub mod product;
pub mod template;
pub mod vendor;

/// Trim an optional text field, turning blank input into `None`.
pub(crate) fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Replace `current` with `update` when the caller supplied a value.
///
/// An explicit blank string clears the field.
pub(crate) fn patch(current: &mut Option<String>, update: Option<String>) {
    if let Some(value) = update {
        *current = clean(Some(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean() {
        assert_eq!(clean(Some("  Recife ".to_string())).as_deref(), Some("Recife"));
        assert_eq!(clean(Some("   ".to_string())), None);
        assert_eq!(clean(None), None);
    }

    #[test]
    fn test_patch() {
        let mut field = Some("old".to_string());
        patch(&mut field, None);
        assert_eq!(field.as_deref(), Some("old"));
        patch(&mut field, Some("new".to_string()));
        assert_eq!(field.as_deref(), Some("new"));
        patch(&mut field, Some(String::new()));
        assert_eq!(field, None);
    }
}
