//! Error types for resource operations.
//!
//! Every resource operation returns [`ApiError`], which layers the
//! resource-level failures over the transport and serialization errors:
//!
//! - [`MissingParameterError`]: a required field was absent; no request was sent
//! - [`InvalidParameterError`]: a value outside its closed set, an empty
//!   identifier, or a name that could not be resolved to an id
//! - [`UnexpectedResponseError`]: the request was delivered but the status
//!   was `>= 400` or not the one the operation defines
//! - [`HttpError`]: the request could not be built or delivered
//! - [`SerializerError`]: a successful response body could not be decoded
//!
//! Nothing is retried.
//!
//! # Example
//!
//! ```rust,ignore
//! use redmine_api::rest::ApiError;
//!
//! match client.issue().show(42.into(), &params).await {
//!     Ok(issue) => println!("{issue}"),
//!     Err(ApiError::UnexpectedResponse(e)) if e.response.code == 404 => {
//!         println!("no such issue");
//!     }
//!     Err(e) => println!("request failed: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::{HttpError, HttpResponse};
use crate::wire::SerializerError;

/// Required parameters were not supplied.
///
/// # Example
///
/// ```rust
/// use redmine_api::rest::MissingParameterError;
///
/// let error = MissingParameterError::new("user", vec!["login", "mail"]);
/// assert_eq!(
///     error.to_string(),
///     "Missing required parameters for user: `login`, `mail`"
/// );
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Missing required parameters for {resource}: `{}`", .parameters.join("`, `"))]
pub struct MissingParameterError {
    /// The resource family the payload was meant for.
    pub resource: &'static str,
    /// The missing parameter names, in declaration order.
    pub parameters: Vec<&'static str>,
}

impl MissingParameterError {
    /// Creates a new error for `resource` listing the missing `parameters`.
    #[must_use]
    pub fn new(resource: &'static str, parameters: Vec<&'static str>) -> Self {
        Self {
            resource,
            parameters,
        }
    }
}

/// A parameter value is not acceptable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid value '{value}' for parameter '{parameter}': expected {expected}")]
pub struct InvalidParameterError {
    /// The parameter name.
    pub parameter: String,
    /// The rejected value.
    pub value: String,
    /// What was expected instead.
    pub expected: String,
}

impl InvalidParameterError {
    /// Creates a new error.
    #[must_use]
    pub fn new(
        parameter: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            parameter: parameter.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Creates the error for a value outside a closed set.
    #[must_use]
    pub fn one_of(parameter: &str, value: &str, allowed: &[&str]) -> Self {
        Self::new(parameter, value, format!("one of {}", allowed.join(", ")))
    }
}

/// The server answered, but not the way the operation expects.
///
/// The full response is kept so callers can inspect the status and the
/// error document Redmine returns (`{"errors": [...]}` for validation
/// failures).
#[derive(Debug, Error)]
#[error("Unexpected response status {} (expected {})", .response.code, expected_text(.expected_status))]
pub struct UnexpectedResponseError {
    /// The raw response.
    pub response: HttpResponse,
    /// The status the operation requires, when it defines one.
    pub expected_status: Option<u16>,
    /// Decoding failure of the error body, if any.
    #[source]
    pub source: Option<SerializerError>,
}

fn expected_text(expected: &Option<u16>) -> String {
    expected.map_or_else(|| "a status below 400".to_string(), |code| code.to_string())
}

impl UnexpectedResponseError {
    /// Creates an error for `response`.
    #[must_use]
    pub const fn new(response: HttpResponse, expected_status: Option<u16>) -> Self {
        Self {
            response,
            expected_status,
            source: None,
        }
    }

    /// Returns the error messages Redmine put in the body, if it is a JSON
    /// `{"errors": [...]}` document.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        serde_json::from_str::<serde_json::Value>(&self.response.body)
            .ok()
            .and_then(|body| body.get("errors").cloned())
            .and_then(|errors| match errors {
                serde_json::Value::Array(items) => Some(
                    items
                        .into_iter()
                        .filter_map(|item| item.as_str().map(ToString::to_string))
                        .collect(),
                ),
                serde_json::Value::String(message) => Some(vec![message]),
                _ => None,
            })
            .unwrap_or_default()
    }
}

/// Umbrella error for resource operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required parameters were missing.
    #[error(transparent)]
    MissingParameter(#[from] MissingParameterError),

    /// A parameter value was rejected.
    #[error(transparent)]
    InvalidParameter(#[from] InvalidParameterError),

    /// The response status was not acceptable.
    #[error(transparent)]
    UnexpectedResponse(#[from] Box<UnexpectedResponseError>),

    /// The request could not be delivered.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The response body could not be decoded.
    #[error(transparent)]
    Serializer(#[from] SerializerError),
}

impl From<UnexpectedResponseError> for ApiError {
    fn from(error: UnexpectedResponseError) -> Self {
        Self::UnexpectedResponse(Box::new(error))
    }
}

impl ApiError {
    /// Returns the response status for [`ApiError::UnexpectedResponse`].
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedResponse(e) => Some(e.response.code),
            _ => None,
        }
    }

    /// Returns the raw response for [`ApiError::UnexpectedResponse`].
    #[must_use]
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::UnexpectedResponse(e) => Some(&e.response),
            _ => None,
        }
    }
}

// Verify ApiError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiError>();
};
