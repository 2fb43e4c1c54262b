//! HTTP client types for Redmine API communication.
//!
//! This module provides the transport layer underneath the resource
//! handles: request/response types, the [`HttpTransport`] seam and the
//! default `reqwest`-backed [`HttpClient`].
//!
//! # Overview
//!
//! - [`HttpTransport`]: sends an [`HttpRequest`], returns an [`HttpResponse`]
//! - [`HttpClient`]: the default async transport
//! - [`HttpRequest`]: a request to be sent to the server
//! - [`HttpResponse`]: status, lower-cased headers and raw body text
//! - [`HttpMethod`]: supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`DataType`]: content types for request bodies (JSON, XML, bytes)
//!
//! # Example
//!
//! ```rust,ignore
//! use redmine_api::clients::{HttpClient, HttpTransport};
//!
//! let client = HttpClient::new(&config)?;
//! let response = client.get("/projects.json").await?;
//!
//! if response.is_ok() {
//!     println!("{}", response.body);
//! }
//! ```
//!
//! # Status codes
//!
//! The transport never turns a status code into an error. The resource
//! layer maps `>= 400` (and unexpected success codes) to
//! [`UnexpectedResponseError`](crate::rest::UnexpectedResponseError).

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod transport;

pub use errors::{HttpError, InvalidHttpRequestError};
pub use http_client::{HttpClient, API_KEY_HEADER, SDK_VERSION, SWITCH_USER_HEADER};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
pub use transport::HttpTransport;
