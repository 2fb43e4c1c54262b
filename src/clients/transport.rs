//! The transport seam between the resource layer and the network.

use crate::clients::errors::HttpError;
use crate::clients::http_request::{DataType, HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;

/// Sends HTTP requests to a Redmine server.
///
/// Implementors only provide [`send`](Self::send); the verb helpers build a
/// request and delegate to it. Responses are returned whatever their status
/// code: error statuses are interpreted by the caller.
///
/// [`HttpClient`](crate::clients::HttpClient) is the default implementation.
/// Tests substitute an in-memory transport.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use redmine_api::clients::{HttpError, HttpRequest, HttpResponse, HttpTransport};
///
/// struct Canned;
///
/// impl HttpTransport for Canned {
///     async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, HttpError> {
///         Ok(HttpResponse::new(200, HashMap::new(), "{}"))
///     }
/// }
/// ```
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    /// Sends a request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when the request cannot be built or delivered.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;

    /// Sends a GET request to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when the request cannot be delivered.
    async fn get(&self, path: &str) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Get, path).build()?;
        self.send(request).await
    }

    /// Sends a POST request with `body` of the given type.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when the request cannot be delivered.
    async fn post(
        &self,
        path: &str,
        body: Vec<u8>,
        body_type: DataType,
    ) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Post, path)
            .body(body)
            .body_type(body_type)
            .build()?;
        self.send(request).await
    }

    /// Sends a PUT request with `body` of the given type.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when the request cannot be delivered.
    async fn put(
        &self,
        path: &str,
        body: Vec<u8>,
        body_type: DataType,
    ) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Put, path)
            .body(body)
            .body_type(body_type)
            .build()?;
        self.send(request).await
    }

    /// Sends a DELETE request to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when the request cannot be delivered.
    async fn delete(&self, path: &str) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Delete, path).build()?;
        self.send(request).await
    }
}
