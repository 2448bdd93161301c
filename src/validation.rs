//! Request payload validation.
//!
//! Each check either passes or records a field-level message; callers turn a
//! non-empty error map into an `ApiError::validation_error` response.

use std::collections::HashMap;

use crate::config;
use crate::error::ApiError;

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 255;
pub const DESCRIPTION_MAX: usize = 500;
pub const NAME_MIN: usize = 2;
pub const TAG_NAME_MAX: usize = 50;
pub const MAX_TAGS: usize = 10;

/// Accumulates field-level validation failures
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        // First failure per field wins
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consume into a validation error, or Ok(()) when nothing failed
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Validation failed", Some(self.errors)))
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    // Domain needs at least one dot with content on both sides
    domain.split('.').count() >= 2 && !domain.starts_with('.') && !domain.ends_with('.')
}

pub fn check_email(errors: &mut FieldErrors, email: &str) {
    if !is_valid_email(email) {
        errors.add("email", "Invalid email address");
    }
}

/// Password policy: bounded length, at least one lowercase, uppercase and digit
pub fn check_password(errors: &mut FieldErrors, password: &str) {
    let security = &config::config().security;

    if password.len() < security.password_min_length {
        errors.add(
            "password",
            format!("Password must be at least {} characters", security.password_min_length),
        );
        return;
    }
    if password.len() > security.password_max_length {
        errors.add(
            "password",
            format!("Password must not exceed {} characters", security.password_max_length),
        );
        return;
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.add("password", "Password must contain at least one lowercase letter");
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.add("password", "Password must contain at least one uppercase letter");
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.add("password", "Password must contain at least one number");
    }
}

pub fn check_name(errors: &mut FieldErrors, name: &str) {
    if name.chars().count() < NAME_MIN {
        errors.add("name", format!("Name must be at least {} characters", NAME_MIN));
    }
}

pub fn check_title(errors: &mut FieldErrors, title: &str) {
    let len = title.chars().count();
    if len < TITLE_MIN {
        errors.add("title", format!("Title must be at least {} characters", TITLE_MIN));
    } else if len > TITLE_MAX {
        errors.add("title", format!("Title must not exceed {} characters", TITLE_MAX));
    }
}

pub fn check_description(errors: &mut FieldErrors, description: &str) {
    if description.chars().count() > DESCRIPTION_MAX {
        errors.add(
            "description",
            format!("Description must not exceed {} characters", DESCRIPTION_MAX),
        );
    }
}

pub fn check_content(errors: &mut FieldErrors, content: &str) {
    if content.is_empty() {
        errors.add("content", "Content cannot be empty");
    }
}

pub fn check_tags(errors: &mut FieldErrors, tags: &[String]) {
    if tags.len() > MAX_TAGS {
        errors.add("tags", format!("At most {} tags are allowed", MAX_TAGS));
        return;
    }
    if tags.iter().any(|t| t.chars().count() > TAG_NAME_MAX) {
        errors.add("tags", format!("Tag names must not exceed {} characters", TAG_NAME_MAX));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.example.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user name@example.com"));
    }

    #[test]
    fn password_policy_requires_mixed_classes() {
        let mut errors = FieldErrors::new();
        check_password(&mut errors, "alllowercase1");
        assert!(!errors.is_empty());

        let mut errors = FieldErrors::new();
        check_password(&mut errors, "Short1");
        assert!(!errors.is_empty());

        let mut errors = FieldErrors::new();
        check_password(&mut errors, "Acceptable1");
        assert!(errors.is_empty());
    }

    #[test]
    fn title_bounds() {
        let mut errors = FieldErrors::new();
        check_title(&mut errors, "ok");
        assert!(!errors.is_empty());

        let mut errors = FieldErrors::new();
        check_title(&mut errors, &"x".repeat(256));
        assert!(!errors.is_empty());

        let mut errors = FieldErrors::new();
        check_title(&mut errors, "A valid title");
        assert!(errors.is_empty());
    }

    #[test]
    fn tag_limits() {
        let mut errors = FieldErrors::new();
        let eleven: Vec<String> = (0..11).map(|i| format!("tag{}", i)).collect();
        check_tags(&mut errors, &eleven);
        assert!(!errors.is_empty());

        let mut errors = FieldErrors::new();
        check_tags(&mut errors, &vec!["rust".to_string(), "axum".to_string()]);
        assert!(errors.is_empty());
    }

    #[test]
    fn field_errors_first_failure_wins() {
        let mut errors = FieldErrors::new();
        errors.add("email", "first");
        errors.add("email", "second");
        let err = errors.into_result().unwrap_err();
        let body = err.to_json();
        assert_eq!(body["error"]["field_errors"]["email"], "first");
    }
}
