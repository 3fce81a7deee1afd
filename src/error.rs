use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    // Transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    // Server errors
    #[error("{message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    // Local errors
    #[error("not logged in, run `issuedesk login` first")]
    NotLoggedIn,

    #[error("invalid {kind} '{value}', expected one of: {expected}")]
    InvalidValue {
        kind: &'static str,
        value: String,
        expected: String,
    },

    #[error("cannot sort by '{0}'")]
    InvalidSortField(String),

    #[error("invalid URL '{0}': {1}")]
    InvalidUrl(String, String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl DeskError {
    pub fn invalid_value(kind: &'static str, value: &str, expected: &[&str]) -> Self {
        DeskError::InvalidValue {
            kind,
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }

    /// Build a client-side validation error from per-field messages.
    pub fn form(fields: BTreeMap<String, String>) -> Self {
        let message = fields
            .iter()
            .map(|(field, msg)| format!("{field}: {msg}"))
            .collect::<Vec<_>>()
            .join("; ");
        DeskError::Validation { message, fields }
    }

    /// Whether re-authenticating might fix this error.
    pub fn needs_login(&self) -> bool {
        matches!(self, DeskError::Unauthorized(_) | DeskError::NotLoggedIn)
    }

    /// Field-level messages carried by a validation failure.
    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            DeskError::Validation { fields, .. } if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }
}

impl From<std::convert::Infallible> for DeskError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

pub type Result<T> = std::result::Result<T, DeskError>;
