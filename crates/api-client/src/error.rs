//! Errors returned by the DevFinder API client.
//!
//! Every failure falls into one of three buckets the UI cares about:
//! - no response at all (timeout, connection refused, DNS)
//! - the server answered with an error status
//! - the server answered successfully but the body made no sense
//!
//! `user_message` turns any of them into the text shown in a notice.

use model::{ModelError, parser};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Shown when no response was received
pub const CONNECTIVITY_MESSAGE: &str = "Check your connection and try again.";

/// Last-resort fallback when nothing more specific is known
pub const GENERIC_MESSAGE: &str = "Please try again.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to reach server: {0}")]
    Transport(String),

    #[error("Server responded with status {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Server {
        status: u16,
        /// `message` (or `error`) from the response body, when present
        message: Option<String>,
        /// Per-field validation errors (`errors` in 400/422 bodies)
        field_errors: BTreeMap<String, String>,
    },

    #[error("Invalid response from server: {0}")]
    Malformed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Build a `Server` error from a status code and the raw response body
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
        let message = parsed
            .as_ref()
            .and_then(|b| parser::message(b).or_else(|| parser::error_text(b)));
        let field_errors = parsed
            .as_ref()
            .map(extract_field_errors)
            .unwrap_or_default();

        ApiError::Server {
            status,
            message,
            field_errors,
        }
    }

    pub(crate) fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            ApiError::Timeout(timeout)
        } else if error.is_builder() {
            ApiError::InvalidRequest(error.to_string())
        } else if error.is_decode() {
            ApiError::Malformed(error.to_string())
        } else {
            ApiError::Transport(error.to_string())
        }
    }

    /// HTTP status for server-reported errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// True when no response was received
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Timeout(_) | ApiError::Transport(_))
    }

    /// The message the server put in the error body, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            ApiError::Server { field_errors, .. } if !field_errors.is_empty() => Some(field_errors),
            _ => None,
        }
    }

    /// Human-readable description for a notice.
    ///
    /// Server messages are surfaced verbatim; otherwise the text depends on
    /// the error class and status.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Timeout(_) | ApiError::Transport(_) => CONNECTIVITY_MESSAGE.to_string(),
            ApiError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Server { status, .. } => status_fallback(*status).to_string(),
            ApiError::Malformed(_) => {
                "Unexpected response from the server. Please try again.".to_string()
            }
            ApiError::InvalidRequest(_) => GENERIC_MESSAGE.to_string(),
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(error: ModelError) -> Self {
        ApiError::Malformed(error.to_string())
    }
}

fn status_fallback(status: u16) -> &'static str {
    match status {
        401 => "Your session has expired. Please log in again.",
        403 => "You are not allowed to do that.",
        404 => "It is no longer available.",
        429 => "Too many requests. Please wait a moment.",
        500..=599 => "Something went wrong on our side. Please try again.",
        _ => GENERIC_MESSAGE,
    }
}

/// `errors` may map a field to a string or to a list of strings (first wins).
fn extract_field_errors(body: &serde_json::Value) -> BTreeMap<String, String> {
    let Some(errors) = body.get("errors").and_then(|e| e.as_object()) else {
        return BTreeMap::new();
    };
    errors
        .iter()
        .filter_map(|(field, value)| {
            let text = match value {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Array(items) => {
                    items.first().and_then(|v| v.as_str()).map(str::to_string)
                }
                _ => None,
            }?;
            Some((field.clone(), text))
        })
        .collect()
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ApiError>;
