//! HTTP-specific error types for the Redmine API client.
//!
//! Status codes never produce an error at this layer: a `404` or `500` is a
//! successfully transported [`HttpResponse`](crate::clients::HttpResponse).
//! Interpreting status codes is left to the resource layer.
//!
//! - [`InvalidHttpRequestError`]: a request failed validation before sending
//! - [`HttpError`]: unified error type for the transport layer
//!
//! # Example
//!
//! ```rust,ignore
//! use redmine_api::clients::{HttpError, HttpTransport};
//!
//! match transport.get("/issues.json").await {
//!     Ok(response) => println!("{}: {}", response.code, response.body),
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//!     Err(HttpError::Transport { message }) => println!("Transport error: {message}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when an HTTP request fails validation.
///
/// Raised before a request is sent when:
/// - a body is provided without a `body_type`
/// - a POST or PUT request carries no body
///
/// # Example
///
/// ```rust
/// use redmine_api::clients::InvalidHttpRequestError;
///
/// let error = InvalidHttpRequestError::MissingBody {
///     method: "post".to_string(),
/// };
///
/// assert_eq!(error.to_string(), "Cannot use post without specifying data.");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A request body was provided without specifying the body type.
    #[error("Cannot set a body without also setting body_type.")]
    MissingBodyType,

    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error from the default client.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failure reported by a custom [`HttpTransport`](crate::clients::HttpTransport).
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
    },
}

impl HttpError {
    /// Creates a [`HttpError::Transport`] from any message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}
