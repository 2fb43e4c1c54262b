//! JSON encoding of wire values.

use crate::wire::{SerializerError, WireValue};

/// Encodes a value as compact JSON, preserving map key order.
///
/// Non-finite floats are written as `null`.
#[must_use]
pub fn encode(value: &WireValue) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Decodes a JSON body.
///
/// An empty (or whitespace-only) body decodes to [`WireValue::Null`], since
/// the server answers some successful requests without content.
///
/// # Errors
///
/// Returns [`SerializerError::Json`] when the body is not valid JSON.
///
/// # Example
///
/// ```rust
/// use redmine_api::wire::{json, WireValue};
///
/// assert_eq!(json::decode("").unwrap(), WireValue::Null);
/// assert!(json::decode("not json").is_err());
/// ```
pub fn decode(body: &str) -> Result<WireValue, SerializerError> {
    if body.trim().is_empty() {
        return Ok(WireValue::Null);
    }

    serde_json::from_str(body).map_err(|source| SerializerError::Json {
        source,
        body: body.to_string(),
    })
}
