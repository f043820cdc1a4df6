//! Parsing of API response bodies.
//!
//! The server wraps most payloads in an envelope:
//! - `{ "message": "...", "data": <payload> }` for mutations and login
//! - a bare JSON array or `{ "data": [...] }` for list endpoints
//!
//! These helpers accept both shapes so the transport layer does not need to
//! care which endpoint it is talking to.

use crate::error::{ModelError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Return the `data` member of an envelope, or the body itself when there is none
pub fn unwrap_data(body: &Value) -> &Value {
    match body.get("data") {
        Some(data) if !data.is_null() => data,
        _ => body,
    }
}

/// Extract the human-readable `message` field, ignoring blanks
pub fn message(body: &Value) -> Option<String> {
    text_field(body, "message")
}

/// Extract the `error` field some endpoints use instead of `message`
pub fn error_text(body: &Value) -> Option<String> {
    text_field(body, "error")
}

fn text_field(body: &Value, field: &str) -> Option<String> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a list endpoint response.
///
/// ## Algorithm
/// 1. A bare array is the list
/// 2. An object with an array under `data` is the list
/// 3. Anything else is an empty list (the server answers `{}` or a message
///    when there is nothing to show)
///
/// Every element must deserialize; a single malformed element fails the
/// whole list so that a half-parsed feed never reaches the cache.
pub fn parse_list<T: DeserializeOwned>(body: &Value, what: &str) -> Result<Vec<T>> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(_) => match body.get("data") {
            Some(Value::Array(items)) => items,
            _ => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            T::deserialize(item)
                .map_err(|e| ModelError::malformed(what, format!("item {idx}: {e}")))
        })
        .collect()
}

/// Parse a single entity out of an envelope (or a bare object).
pub fn parse_entity<T: DeserializeOwned>(body: &Value, what: &str) -> Result<T> {
    let payload = unwrap_data(body);
    if !payload.is_object() {
        return Err(ModelError::malformed(what, "expected a JSON object"));
    }
    T::deserialize(payload).map_err(|e| ModelError::malformed(what, e))
}

/// Parse raw response text into JSON.
///
/// Empty bodies are treated as an empty object: several mutation endpoints
/// answer with no content.
pub fn parse_body(text: &str, what: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(text).map_err(|e| ModelError::malformed(what, e))
}
