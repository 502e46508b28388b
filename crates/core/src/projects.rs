//! Project form and naming rules.

use serde::Deserialize;
use validator::Validate;

use crate::forms::FormInput;

/// Maximum length of a project name in characters.
pub const MAX_PROJECT_NAME_LENGTH: usize = 50;

/// Submitted project form (create and update).
///
/// `name` is `None` when the field was not submitted at all, which is
/// distinct from an explicitly empty name. Empty names are allowed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProjectForm {
    #[serde(default)]
    #[validate(length(max = 50, message = "Ensure this value has at most 50 characters."))]
    pub name: Option<String>,
}

impl ProjectForm {
    /// Build a form pre-populated with an existing name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Trim surrounding whitespace before validation.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_string()),
        }
    }

    /// Whether the submission carried no `name` field at all.
    pub fn is_blank_submission(&self) -> bool {
        self.name.is_none()
    }

    /// The trimmed name, empty when absent.
    pub fn cleaned_name(&self) -> String {
        self.name.as_deref().unwrap_or_default().trim().to_string()
    }
}

impl FormInput for ProjectForm {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_is_allowed() {
        assert!(ProjectForm::with_name("").check().is_ok());
        assert!(ProjectForm::default().check().is_ok());
    }

    #[test]
    fn name_at_limit_is_accepted() {
        let name = "a".repeat(MAX_PROJECT_NAME_LENGTH);
        assert!(ProjectForm::with_name(name).check().is_ok());
    }

    #[test]
    fn name_over_limit_is_rejected() {
        let name = "a".repeat(MAX_PROJECT_NAME_LENGTH + 1);
        let errors = ProjectForm::with_name(name).check().unwrap_err();
        assert!(errors.contains("name"));
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        let name = "é".repeat(MAX_PROJECT_NAME_LENGTH);
        assert!(ProjectForm::with_name(name).check().is_ok());
    }

    #[test]
    fn blank_submission_is_detected() {
        assert!(ProjectForm::default().is_blank_submission());
        assert!(!ProjectForm::with_name("").is_blank_submission());
    }

    #[test]
    fn padding_does_not_count_towards_limit() {
        let name = format!("  {}  ", "a".repeat(MAX_PROJECT_NAME_LENGTH));
        assert!(ProjectForm::with_name(name).normalized().check().is_ok());
    }

    #[test]
    fn cleaned_name_trims_whitespace() {
        assert_eq!(ProjectForm::with_name("  Groceries ").cleaned_name(), "Groceries");
        assert_eq!(ProjectForm::default().cleaned_name(), "");
    }
}
