//! Client-side form validation
//!
//! Runs before any request is sent. Each check reports the field it belongs
//! to so forms can show the message next to the input.

use chrono::NaiveDate;

use crate::core::models::auth::{LoginRequest, SignupRequest};
use crate::core::models::emails::EmailFilters;

/// Minimum password length on signup
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Length bounds for first and last names
pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_NAME_LENGTH: usize = 50;

/// Date format used by the email filters
pub const FILTER_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Dates must use the YYYY-MM-DD format")]
    InvalidDate,

    #[error("The start date must not be after the end date")]
    InvertedDateRange,
}

/// Errors collected for one form, keyed by input name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub errors: Vec<(&'static str, ValidationError)>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add(&mut self, field: &'static str, error: ValidationError) {
        self.errors.push((field, error));
    }

    /// First error for `field`, if any.
    pub fn for_field(&self, field: &str) -> Option<&ValidationError> {
        self.errors
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, error)| error)
    }

    pub fn to_result(&self) -> Result<(), ValidationError> {
        match self.errors.first() {
            Some((_, error)) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Loose address check: one `@`, a non-empty local part and a dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

fn check_email(result: &mut ValidationResult, email: &str) {
    if email.trim().is_empty() {
        result.add("email", ValidationError::Required { field: "Email" });
    } else if !is_valid_email(email) {
        result.add("email", ValidationError::InvalidEmail);
    }
}

fn check_name(result: &mut ValidationResult, key: &'static str, label: &'static str, value: &str) {
    let len = value.trim().chars().count();
    if len == 0 {
        result.add(key, ValidationError::Required { field: label });
    } else if len < MIN_NAME_LENGTH {
        result.add(
            key,
            ValidationError::TooShort {
                field: label,
                min: MIN_NAME_LENGTH,
            },
        );
    } else if len > MAX_NAME_LENGTH {
        result.add(
            key,
            ValidationError::TooLong {
                field: label,
                max: MAX_NAME_LENGTH,
            },
        );
    }
}

pub fn validate_login(form: &LoginRequest) -> ValidationResult {
    let mut result = ValidationResult::new();
    check_email(&mut result, &form.email);
    if form.password.is_empty() {
        result.add("password", ValidationError::Required { field: "Password" });
    }
    result
}

pub fn validate_signup(form: &SignupRequest, confirm_password: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    check_name(&mut result, "first_name", "First name", &form.first_name);
    check_name(&mut result, "last_name", "Last name", &form.last_name);
    check_email(&mut result, &form.email);

    if form.password.is_empty() {
        result.add("password", ValidationError::Required { field: "Password" });
    } else if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        result.add(
            "password",
            ValidationError::TooShort {
                field: "Password",
                min: MIN_PASSWORD_LENGTH,
            },
        );
    }
    if form.password != confirm_password {
        result.add("confirm_password", ValidationError::PasswordMismatch);
    }
    result
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, FILTER_DATE_FORMAT)
            .map(Some)
            .map_err(|_| ValidationError::InvalidDate),
    }
}

pub fn validate_email_filters(filters: &EmailFilters) -> ValidationResult {
    let mut result = ValidationResult::new();
    let after = parse_date(filters.received_after.as_deref());
    let before = parse_date(filters.received_before.as_deref());

    if let Err(err) = &after {
        result.add("received_after", err.clone());
    }
    if let Err(err) = &before {
        result.add("received_before", err.clone());
    }
    if let (Ok(Some(after)), Ok(Some(before))) = (after, before)
        && after > before
    {
        result.add("received_after", ValidationError::InvertedDateRange);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(first: &str, last: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email(" ana.lee+x@mail.example.org "));
        assert!(!is_valid_email("ana"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana@.com"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
    }

    #[test]
    fn test_login_requires_fields() {
        let result = validate_login(&LoginRequest::default());

        assert!(!result.is_valid());
        assert_eq!(
            result.for_field("email"),
            Some(&ValidationError::Required { field: "Email" })
        );
        assert_eq!(result.for_field("password").unwrap().to_string(), "Password is required");
    }

    #[test]
    fn test_login_valid() {
        let form = LoginRequest {
            email: "ana@example.com".to_string(),
            password: "x".to_string(),
        };
        assert!(validate_login(&form).is_valid());
    }

    #[test]
    fn test_signup_rules() {
        let result = validate_signup(&signup("A", "Lee", "bad", "short"), "other");

        assert_eq!(
            result.for_field("first_name").unwrap().to_string(),
            "First name must be at least 2 characters"
        );
        assert!(result.for_field("last_name").is_none());
        assert_eq!(result.for_field("email"), Some(&ValidationError::InvalidEmail));
        assert_eq!(
            result.for_field("password").unwrap().to_string(),
            "Password must be at least 8 characters"
        );
        assert_eq!(
            result.for_field("confirm_password"),
            Some(&ValidationError::PasswordMismatch)
        );
        assert_eq!(result.to_result().unwrap_err().to_string(), "First name must be at least 2 characters");
    }

    #[test]
    fn test_signup_name_too_long() {
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        let result = validate_signup(&signup("Ana", &long, "ana@example.com", "password1"), "password1");

        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            result.for_field("last_name"),
            Some(ValidationError::TooLong { max: 50, .. })
        ));
    }

    #[test]
    fn test_signup_valid() {
        let result = validate_signup(&signup("Ana", "Lee", "ana@example.com", "password1"), "password1");
        assert!(result.is_valid());
        assert!(result.to_result().is_ok());
    }

    #[test]
    fn test_filter_dates() {
        let mut filters = EmailFilters {
            received_after: Some("2025-02-01".to_string()),
            received_before: Some("2025-01-01".to_string()),
            ..EmailFilters::default()
        };
        assert_eq!(
            validate_email_filters(&filters).for_field("received_after"),
            Some(&ValidationError::InvertedDateRange)
        );

        filters.received_before = Some("01/03/2025".to_string());
        let result = validate_email_filters(&filters);
        assert_eq!(result.for_field("received_before"), Some(&ValidationError::InvalidDate));
        assert!(result.for_field("received_after").is_none());

        filters.received_before = Some("2025-03-01".to_string());
        assert!(validate_email_filters(&filters).is_valid());
        assert!(validate_email_filters(&EmailFilters::default()).is_valid());
    }
}
