//! Account forms and login redirect rules.

use serde::Deserialize;
use validator::Validate;

use crate::forms::{FormErrors, FormInput};

/// Minimum accepted password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Where users land after logging in when no `next` is given.
pub const DEFAULT_LOGIN_REDIRECT: &str = "/projects/";

pub const INVALID_CREDENTIALS_MESSAGE: &str =
    "The email address and/or password you specified are not correct.";

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

impl FormInput for LoginForm {}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters long."))]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

impl FormInput for SignupForm {
    fn check_extra(&self, errors: &mut FormErrors) {
        if self.password1 != self.password2 {
            errors.add("password2", "You must type the same password each time.");
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PasswordChangeForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub old_password: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters long."))]
    pub new_password1: String,
    #[serde(default)]
    pub new_password2: String,
}

impl FormInput for PasswordChangeForm {
    fn check_extra(&self, errors: &mut FormErrors) {
        if self.new_password1 != self.new_password2 {
            errors.add("new_password2", "You must type the same password each time.");
        }
    }
}

/// Normalize an email for lookup and storage.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Resolve the post-login destination.
///
/// Only same-site absolute paths are honoured; anything else (empty, scheme-
/// relative `//host`, full URLs, backslash tricks) falls back to
/// [`DEFAULT_LOGIN_REDIRECT`].
pub fn safe_next_path(next: Option<&str>) -> &str {
    match next.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.contains("://") =>
        {
            path
        }
        _ => DEFAULT_LOGIN_REDIRECT,
    }
}
