//! Decoding response bodies according to their content type.

use crate::clients::HttpResponse;
use crate::wire::{json, xml, SerializerError, WireValue};

/// Format of a response body, derived from its `Content-Type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyFormat {
    /// Any content type mentioning `json`.
    Json,
    /// Any content type mentioning `xml`.
    Xml,
    /// Anything else, including a missing header.
    Text,
}

impl BodyFormat {
    /// Classifies a response by its `Content-Type` header.
    #[must_use]
    pub fn of(response: &HttpResponse) -> Self {
        let content_type = response
            .content_type()
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if content_type.contains("json") {
            Self::Json
        } else if content_type.contains("xml") {
            Self::Xml
        } else {
            Self::Text
        }
    }
}

/// Decodes a response body.
///
/// JSON and XML bodies are parsed; any other body is returned as a
/// [`WireValue::String`]. An empty body is [`WireValue::Null`] whatever the
/// content type.
///
/// # Errors
///
/// Returns [`SerializerError`] when a JSON or XML body is malformed.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use redmine_api::clients::HttpResponse;
/// use redmine_api::rest::decode_body;
/// use redmine_api::wire::WireValue;
///
/// let mut headers = HashMap::new();
/// headers.insert("content-type".to_string(), vec!["application/json".to_string()]);
///
/// let response = HttpResponse::new(200, headers, r#"{"issue":{"id":1}}"#);
/// let body = decode_body(&response).unwrap();
/// assert_eq!(body.get("issue").and_then(|i| i.get("id")), Some(&WireValue::Int(1)));
/// ```
pub fn decode_body(response: &HttpResponse) -> Result<WireValue, SerializerError> {
    if response.body.trim().is_empty() {
        return Ok(WireValue::Null);
    }

    match BodyFormat::of(response) {
        BodyFormat::Json => json::decode(&response.body),
        BodyFormat::Xml => xml::decode(&response.body),
        BodyFormat::Text => Ok(WireValue::String(response.body.clone())),
    }
}
