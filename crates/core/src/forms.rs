//! Shared form validation contract.
//!
//! Every submitted form is its own struct deriving [`validator::Validate`] for
//! field rules. [`FormInput`] layers cross-field checks on top and collapses
//! the result into [`FormErrors`], which the view layer hands to templates so
//! an invalid submission is re-rendered instead of failing the request.

use std::collections::BTreeMap;

use serde::Serialize;
use validator::{Validate, ValidationErrors};

/// Key under which errors that do not belong to a single field are stored.
pub const NON_FIELD_ERRORS: &str = "form";

/// Field name -> human-readable messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    /// Build an error set holding a single message for `field`.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`, empty if none.
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// The first message across all fields, used when only one line fits.
    pub fn first_message(&self) -> Option<&str> {
        self.0.values().flatten().next().map(String::as_str)
    }
}

impl From<&ValidationErrors> for FormErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut out = FormErrors::default();
        for (field, field_errors) in errors.field_errors() {
            let field = field.to_string();
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", error.code));
                out.add(&field, message);
            }
        }
        out
    }
}

/// Validation contract shared by every form.
///
/// Implementors get field-level rules from `#[derive(Validate)]` and may add
/// cross-field rules in [`FormInput::check_extra`].
pub trait FormInput: Validate {
    /// Rules spanning several fields. No-op by default.
    fn check_extra(&self, _errors: &mut FormErrors) {}

    /// Run all rules, returning every failure at once.
    fn check(&self) -> Result<(), FormErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FormErrors::default(),
            Err(e) => FormErrors::from(&e),
        };
        self.check_extra(&mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "Required"))]
        value: String,
        other: String,
    }

    impl FormInput for Probe {
        fn check_extra(&self, errors: &mut FormErrors) {
            if self.other == "bad" {
                errors.add(NON_FIELD_ERRORS, "Other is bad");
            }
        }
    }

    #[test]
    fn valid_form_passes() {
        let probe = Probe {
            value: "x".into(),
            other: "ok".into(),
        };
        assert!(probe.check().is_ok());
    }

    #[test]
    fn field_and_cross_field_errors_are_merged() {
        let probe = Probe {
            value: String::new(),
            other: "bad".into(),
        };
        let errors = probe.check().unwrap_err();
        assert_eq!(errors.get("value"), ["Required".to_string()]);
        assert_eq!(errors.get(NON_FIELD_ERRORS), ["Other is bad".to_string()]);
    }

    #[test]
    fn first_message_follows_field_order() {
        let mut errors = FormErrors::default();
        errors.add("zeta", "last");
        errors.add("alpha", "first");
        assert_eq!(errors.first_message(), Some("first"));
    }

    #[test]
    fn missing_field_yields_empty_slice() {
        assert!(FormErrors::default().get("nothing").is_empty());
    }
}
