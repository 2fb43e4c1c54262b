//! Serialization error types.
//!
//! A [`SerializerError`] is raised when a response body cannot be parsed as
//! the format its content type claims. It is never retried.

use thiserror::Error;

/// Error returned when a body cannot be decoded.
///
/// The offending body is kept for diagnostics.
///
/// # Example
///
/// ```rust
/// use redmine_api::wire::{json, SerializerError};
///
/// let error = json::decode("not json").unwrap_err();
/// assert!(matches!(error, SerializerError::Json { .. }));
/// assert_eq!(error.body(), "not json");
/// ```
#[derive(Debug, Error)]
pub enum SerializerError {
    /// The body is not syntactically valid JSON.
    #[error("Could not decode JSON body: {source}")]
    Json {
        /// The underlying parser error.
        source: serde_json::Error,
        /// The body that failed to decode.
        body: String,
    },

    /// The body is not well-formed XML.
    #[error("Could not decode XML body: {message}")]
    Xml {
        /// Description of the markup error.
        message: String,
        /// The body that failed to decode.
        body: String,
    },

    /// The body decoded, but not to the document shape the caller needs.
    #[error("Expected {expected} in response body")]
    Shape {
        /// What the caller expected, e.g. "a JSON or XML object".
        expected: &'static str,
        /// The body that was received.
        body: String,
    },
}

impl SerializerError {
    /// Returns the body that failed to decode.
    #[must_use]
    pub fn body(&self) -> &str {
        match self {
            Self::Json { body, .. } | Self::Xml { body, .. } | Self::Shape { body, .. } => body,
        }
    }

    pub(crate) fn xml(message: impl ToString, body: &str) -> Self {
        Self::Xml {
            message: message.to_string(),
            body: body.to_string(),
        }
    }
}
