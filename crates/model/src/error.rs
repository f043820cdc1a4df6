//! Error types for the model crate.
//!
//! Parsing a server response into domain types can fail in a handful of
//! well-defined ways. Each variant carries enough context to be logged
//! without the original payload.

use thiserror::Error;

/// Errors that can occur while turning wire data into domain types
#[derive(Error, Debug)]
pub enum ModelError {
    /// A field had a value outside its allowed set
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// A response body did not have the shape we expected
    ///
    /// `what` names the payload (e.g. "feed", "session user") so callers can
    /// surface a useful message.
    #[error("Malformed {what}: {reason}")]
    Malformed { what: String, reason: String },
}

impl ModelError {
    pub(crate) fn malformed(what: &str, reason: impl ToString) -> Self {
        ModelError::Malformed {
            what: what.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ModelError>;
