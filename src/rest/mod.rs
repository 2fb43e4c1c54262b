//! REST resource layer for the Redmine API.
//!
//! This module provides everything between a caller and the transport:
//!
//! - **[`RedmineClient`]**: the facade that owns a transport and hands out
//!   resource handles
//! - **[`fetch_all`]**: pagination and page merging for collection endpoints
//! - **Path building**: [`build_path`] and [`path_segment`]
//! - **[`decode_body`]**: content-type driven response decoding
//! - **Registry**: [`ApiKind`], [`Api`] and the [`ResourceApi`] trait
//! - **[`resources`]**: one handle per resource family
//! - **Errors**: [`ApiError`] and the errors it wraps
//!
//! # Example
//!
//! ```rust,ignore
//! use redmine_api::{ApiKey, RedmineClient, RedmineConfig, ServerUrl};
//! use redmine_api::wire::WireValue;
//! use serde_json::json;
//!
//! let config = RedmineConfig::builder()
//!     .url(ServerUrl::new("https://redmine.example.com")?)
//!     .api_key(ApiKey::new("my-api-key")?)
//!     .build()?;
//! let client = RedmineClient::new(&config)?;
//!
//! // 250 issues in three requests of 100, 100 and 50
//! let params = WireValue::from(json!({"project_id": 1, "limit": 250}));
//! let issues = client.issue().list(params.as_map().unwrap()).await?;
//!
//! // Failed requests keep the server's answer
//! match client.issue().show(999_999, &Default::default()).await {
//!     Err(e) if e.status() == Some(404) => println!("no such issue"),
//!     other => println!("{:?}", other?),
//! }
//! ```

mod client;
mod errors;
mod pagination;
mod path;
mod registry;
mod resource_id;
mod response;

pub mod resources;

pub use client::RedmineClient;
pub use errors::{
    ApiError, InvalidParameterError, MissingParameterError, UnexpectedResponseError,
};
pub use pagination::{fetch_all, sanitize_params, DEFAULT_LIMIT, MAX_PAGE_SIZE, UNBOUNDED_LIMIT};
pub use path::{build_path, path_segment};
pub use registry::{Api, ApiKind, ResourceApi};
pub use resource_id::ResourceId;
pub use response::{decode_body, BodyFormat};
