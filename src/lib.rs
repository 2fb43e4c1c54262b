//! # Redmine API Rust Client
//!
//! A Rust client for the Redmine REST API, providing validated
//! configuration, a pluggable HTTP transport, and one handle per resource
//! family.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`RedmineConfig`] and [`RedmineConfigBuilder`]
//! - API key or basic authentication, plus user impersonation
//! - An async HTTP transport ([`HttpClient`]) behind the [`HttpTransport`] trait
//! - Pagination that fetches whole collections past the 100-per-page cap
//! - [`wire::WireValue`], a dynamic value with JSON and XML codecs
//! - Resource handles for issues, projects, users, wiki pages and more
//!
//! ## Quick Start
//!
//! ```rust
//! use redmine_api::{ApiKey, RedmineConfig, ServerUrl};
//!
//! let config = RedmineConfig::builder()
//!     .url(ServerUrl::new("https://redmine.example.com").unwrap())
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use redmine_api::{RedmineClient, RedmineConfig};
//! use redmine_api::wire::WireValue;
//! use serde_json::json;
//!
//! let client = RedmineClient::new(&config)?;
//!
//! // Every open issue of a project, however many pages it takes
//! let params = WireValue::from(json!({
//!     "project_id": "website",
//!     "status_id": "open",
//!     "limit": redmine_api::rest::UNBOUNDED_LIMIT,
//! }));
//! let issues = client.issue().list(params.as_map().unwrap()).await?;
//!
//! // Create a version; the payload is sent as XML
//! let version = WireValue::from(json!({"name": "2.0", "status": "open"}));
//! client.version().create("website", version.as_map().unwrap()).await?;
//! ```
//!
//! ## Selecting Resources by Name
//!
//! ```rust,ignore
//! use redmine_api::rest::{Api, ApiKind};
//!
//! let kind: ApiKind = "tracker".parse()?;
//! if let Api::Tracker(mut trackers) = client.api(kind) {
//!     let names = trackers.list_names(false).await?;
//! }
//! ```
//!
//! ## Custom Transports
//!
//! [`RedmineClient::with_transport`] accepts any [`HttpTransport`], e.g. an
//! in-memory fake for tests.
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Newtypes validate on construction and required
//!   parameters are checked before any request is sent
//! - **Thread-safe**: [`RedmineClient`] and [`HttpClient`] are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio async runtime
//! - **Errors carry the response**: Failed requests keep the status and body

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;
pub mod wire;

// Re-export public types at crate root for convenience
pub use config::{ApiKey, Credentials, Password, RedmineConfig, RedmineConfigBuilder, ServerUrl};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpTransport, InvalidHttpRequestError,
};

// Re-export the REST facade
pub use rest::{
    ApiError, ApiKind, InvalidParameterError, MissingParameterError, RedmineClient, ResourceId,
    UnexpectedResponseError,
};
pub use wire::{SerializerError, WireMap, WireValue};
