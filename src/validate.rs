//! Client-side form validation.
//!
//! Every form is checked before it is submitted. Each rule returns the
//! message to show for its field, or `None` when the value passes. A
//! [`FormCheck`] collects the failures and turns them into one
//! [`DeskError::Validation`] carrying every field message.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use jiff::civil::Date;
use regex::Regex;

use crate::error::{DeskError, Result};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length on registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum full name length on registration.
pub const MIN_FULLNAME_LENGTH: usize = 3;

/// Maximum project key length.
pub const MAX_PROJECT_KEY_LENGTH: usize = 10;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex should be valid"));

// ============================================================================
// Field rules
// ============================================================================

pub fn required(value: &str, label: &str) -> Option<String> {
    value.trim().is_empty().then(|| format!("{label} is required"))
}

pub fn email(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some("Email is required".to_string())
    } else if !EMAIL_RE.is_match(value) {
        Some("Please enter a valid email address".to_string())
    } else {
        None
    }
}

/// Login only requires a password to be present.
pub fn login_password(value: &str) -> Option<String> {
    value.is_empty().then(|| "Password is required".to_string())
}

pub fn new_password(value: &str) -> Option<String> {
    if value.is_empty() {
        Some("Password is required".to_string())
    } else if value.chars().count() < MIN_PASSWORD_LENGTH {
        Some(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        ))
    } else {
        None
    }
}

pub fn fullname(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        Some("Fullname is required".to_string())
    } else if value.chars().count() < MIN_FULLNAME_LENGTH {
        Some(format!(
            "Fullname must be at least {MIN_FULLNAME_LENGTH} characters"
        ))
    } else {
        None
    }
}

pub fn project_key(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        Some("Project key is required".to_string())
    } else if value.chars().count() > MAX_PROJECT_KEY_LENGTH {
        Some(format!(
            "Project key must be {MAX_PROJECT_KEY_LENGTH} characters or less"
        ))
    } else {
        None
    }
}

/// Parse an optional `YYYY-MM-DD` date. Blank input is `None`.
pub fn parse_date(value: &str) -> std::result::Result<Option<Date>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<Date>()
        .map(Some)
        .map_err(|_| format!("'{value}' is not a valid date (expected YYYY-MM-DD)"))
}

/// An end date, when present, must not precede the start date.
pub fn date_range(start: &str, end: &str) -> Option<String> {
    match (parse_date(start), parse_date(end)) {
        (Err(e), _) | (_, Err(e)) => Some(e),
        (Ok(Some(start)), Ok(Some(end))) if end < start => {
            Some("End date cannot be before start date".to_string())
        }
        _ => None,
    }
}

/// Parse an optional number field. Blank input is `None`.
pub fn optional_number(value: &str, label: &str) -> Result<Option<f64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse::<f64>().map(Some).map_err(|_| {
        DeskError::form(BTreeMap::from([(
            label.to_string(),
            format!("'{value}' is not a number"),
        )]))
    })
}

// ============================================================================
// Form collection
// ============================================================================

/// Collects field failures for one form.
#[derive(Debug, Default)]
pub struct FormCheck {
    fields: BTreeMap<String, String>,
}

impl FormCheck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one rule. The first failure per field wins.
    pub fn check(&mut self, field: &str, outcome: Option<String>) -> &mut Self {
        if let Some(message) = outcome {
            self.fields.entry(field.to_string()).or_insert(message);
        }
        self
    }

    pub fn finish(&mut self) -> Result<()> {
        if self.fields.is_empty() {
            Ok(())
        } else {
            Err(DeskError::form(std::mem::take(&mut self.fields)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_rules() {
        assert_eq!(email("  ").as_deref(), Some("Email is required"));
        assert_eq!(
            email("not-an-email").as_deref(),
            Some("Please enter a valid email address")
        );
        assert_eq!(
            email("a b@c.d").as_deref(),
            Some("Please enter a valid email address")
        );
        assert!(email("dev@acme.io").is_none());
    }

    #[test]
    fn test_password_rules() {
        assert!(login_password("x").is_none());
        assert!(login_password("").is_some());
        assert!(new_password("12345").is_some());
        assert!(new_password("123456").is_none());
    }

    #[test]
    fn test_fullname_rules() {
        assert!(fullname("Al").is_some());
        assert!(fullname("  Al  ").is_some());
        assert!(fullname("Ada").is_none());
    }

    #[test]
    fn test_project_key_rules() {
        assert!(project_key("").is_some());
        assert!(project_key("ABCDEFGHIJK").is_some());
        assert!(project_key("WEB").is_none());
    }

    #[test]
    fn test_date_range() {
        assert!(date_range("2024-03-01", "").is_none());
        assert!(date_range("2024-03-01", "2024-03-01").is_none());
        assert_eq!(
            date_range("2024-03-02", "2024-03-01").as_deref(),
            Some("End date cannot be before start date")
        );
        assert!(date_range("yesterday", "").is_some());
    }

    #[test]
    fn test_optional_number() {
        assert_eq!(optional_number("", "story points").unwrap(), None);
        assert_eq!(optional_number(" 3 ", "story points").unwrap(), Some(3.0));
        assert!(optional_number("three", "story points").is_err());
    }

    #[test]
    fn test_form_check_collects_first_failure_per_field() {
        let mut form = FormCheck::new();
        form.check("email", email(""))
            .check("email", Some("second".to_string()))
            .check("password", login_password("secret"));
        let err = form.finish().unwrap_err();
        let fields = err.field_errors().unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["email"], "Email is required");
    }
}
