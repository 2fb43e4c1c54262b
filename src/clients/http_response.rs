//! HTTP response type for the Redmine API client.

use std::collections::HashMap;

/// An HTTP response from a Redmine server.
///
/// The body is kept both as received (`bytes`) and as text (`body`, with
/// invalid UTF-8 replaced). Decoding the text according to the content type
/// is done by [`decode_body`](crate::rest::decode_body). Header names are
/// stored lower-cased, and a header may carry several values.
///
/// # Example
///
/// ```rust
/// use redmine_api::clients::HttpResponse;
/// use std::collections::HashMap;
///
/// let mut headers = HashMap::new();
/// headers.insert(
///     "content-type".to_string(),
///     vec!["application/json; charset=utf-8".to_string()],
/// );
///
/// let response = HttpResponse::new(200, headers, r#"{"issues":[]}"#);
/// assert!(response.is_ok());
/// assert_eq!(response.content_type(), Some("application/json; charset=utf-8"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lower-cased name.
    pub headers: HashMap<String, Vec<String>>,
    /// The response body as text.
    pub body: String,
    /// The response body exactly as received.
    pub bytes: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    ///
    /// Header names are lower-cased on the way in.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: impl Into<String>) -> Self {
        let body = body.into();
        let bytes = body.clone().into_bytes();
        Self::with_parts(code, headers, body, bytes)
    }

    /// Creates a response from a body that may not be valid UTF-8.
    ///
    /// `bytes` is kept unchanged; `body` holds its lossy text form.
    #[must_use]
    pub fn from_bytes(code: u16, headers: HashMap<String, Vec<String>>, bytes: Vec<u8>) -> Self {
        let body = String::from_utf8_lossy(&bytes).into_owned();
        Self::with_parts(code, headers, body, bytes)
    }

    fn with_parts(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: String,
        bytes: Vec<u8>,
    ) -> Self {
        let mut normalized: HashMap<String, Vec<String>> = HashMap::with_capacity(headers.len());
        for (name, values) in headers {
            normalized
                .entry(name.to_ascii_lowercase())
                .or_default()
                .extend(values);
        }

        Self {
            code,
            headers: normalized,
            body,
            bytes,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of the named header, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `Content-Type` header value, if present.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        for code in 200..=299 {
            let response = HttpResponse::new(code, HashMap::new(), "");
            assert!(
                response.is_ok(),
                "Expected is_ok() to be true for code {code}"
            );
        }
    }

    #[test]
    fn test_is_ok_returns_false_for_4xx_and_5xx() {
        for code in [400, 401, 403, 404, 422, 500] {
            assert!(!HttpResponse::new(code, HashMap::new(), "").is_ok());
        }
    }

    #[test]
    fn test_header_names_are_lowercased() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), vec!["application/xml".to_string()]);

        let response = HttpResponse::new(200, headers, "<issues/>");
        assert!(response.headers.contains_key("content-type"));
        assert_eq!(response.content_type(), Some("application/xml"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("application/xml"));
    }

    #[test]
    fn test_missing_content_type() {
        let response = HttpResponse::new(204, HashMap::new(), "");
        assert!(response.content_type().is_none());
        assert!(response.body.is_empty());
    }

    #[test]
    fn test_binary_body_is_kept_verbatim() {
        let png = vec![0x89, b'P', b'N', b'G', 0xFF];
        let response = HttpResponse::from_bytes(200, HashMap::new(), png.clone());

        assert_eq!(response.bytes, png);
        assert_eq!(response.body, "\u{FFFD}PNG\u{FFFD}");
    }

    #[test]
    fn test_text_body_bytes_match() {
        let response = HttpResponse::new(200, HashMap::new(), "{}");
        assert_eq!(response.bytes, b"{}");
    }
}
