//! Mapping of failed HTTP responses onto [`DeskError`].
//!
//! The server is not consistent about where it puts the human message: it may
//! be a plain `message` string, a `message.error_message` object, a top-level
//! `error_message`, or `error`. Field errors come as an `errors` object keyed
//! by field, or as an array of `{field|path|param, message|msg}` items.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::DeskError;

/// Pull the most specific human message out of an error body.
pub fn extract_message(body: &Value) -> Option<String> {
    let candidates = [
        body.get("message").and_then(Value::as_str),
        body.get("message")
            .and_then(|m| m.get("error_message"))
            .and_then(Value::as_str),
        body.get("error_message").and_then(Value::as_str),
        body.get("error").and_then(Value::as_str),
    ];
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

/// Collect per-field messages from an error body.
pub fn extract_fields(body: &Value) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    match body.get("errors") {
        Some(Value::Object(map)) => {
            for (field, value) in map {
                let message = match value {
                    Value::String(s) => Some(s.clone()),
                    other => other
                        .get("message")
                        .or_else(|| other.get("msg"))
                        .and_then(Value::as_str)
                        .map(str::to_string),
                };
                if let Some(message) = message {
                    fields.insert(field.clone(), message);
                }
            }
        }
        Some(Value::Array(items)) => {
            for item in items {
                let field = ["field", "path", "param"]
                    .iter()
                    .find_map(|k| item.get(*k).and_then(Value::as_str));
                let message = ["message", "msg"]
                    .iter()
                    .find_map(|k| item.get(*k).and_then(Value::as_str));
                if let (Some(field), Some(message)) = (field, message) {
                    fields.insert(field.to_string(), message.to_string());
                }
            }
        }
        _ => {}
    }
    fields
}

/// Translate a non-success HTTP response into an error.
pub fn from_status(status: StatusCode, body: &str) -> DeskError {
    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let message = extract_message(&parsed).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });

    if status == StatusCode::UNAUTHORIZED {
        return DeskError::Unauthorized(message);
    }

    if status.is_client_error() {
        return DeskError::Validation {
            message,
            fields: extract_fields(&parsed),
        };
    }

    DeskError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Translate a transport failure, surfacing timeouts distinctly.
pub fn from_transport(error: reqwest::Error, timeout: Duration) -> DeskError {
    if error.is_timeout() {
        DeskError::Timeout(timeout.as_secs())
    } else {
        DeskError::Http(error)
    }
}
