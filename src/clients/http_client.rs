//! Default HTTP client for Redmine API communication.
//!
//! This module provides [`HttpClient`], the `reqwest`-backed
//! [`HttpTransport`] used by [`RedmineClient`](crate::RedmineClient) unless a
//! custom transport is supplied.

use std::collections::HashMap;

use base64::prelude::*;

use crate::clients::errors::HttpError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::transport::HttpTransport;
use crate::config::{Credentials, RedmineConfig, ServerUrl};

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-Redmine-API-Key";

/// Header naming the user requests are made on behalf of.
pub const SWITCH_USER_HEADER: &str = "X-Redmine-Switch-User";

/// HTTP client for making requests to a Redmine server.
///
/// The client handles:
/// - URL construction from the configured server URL
/// - Default headers: User-Agent, credentials, impersonation
/// - Reading the response body as text, whatever the status code
///
/// Requests are sent once; nothing is retried.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use redmine_api::clients::{HttpClient, HttpTransport};
/// use redmine_api::{ApiKey, RedmineConfig, ServerUrl};
///
/// let config = RedmineConfig::builder()
///     .url(ServerUrl::new("https://redmine.example.com")?)
///     .api_key(ApiKey::new("my-api-key")?)
///     .build()?;
///
/// let client = HttpClient::new(&config)?;
/// let response = client.get("/issues.json?limit=5").await?;
/// println!("{}: {}", response.code, response.body);
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: ServerUrl,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying `reqwest` client
    /// cannot be created (e.g. TLS initialization failure).
    pub fn new(config: &RedmineConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Redmine API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);

        match config.credentials() {
            Credentials::ApiKey(key) => {
                default_headers.insert(API_KEY_HEADER.to_string(), key.as_ref().to_string());
            }
            Credentials::Basic { username, password } => {
                let token = BASE64_STANDARD.encode(format!("{username}:{}", password.as_ref()));
                default_headers.insert("Authorization".to_string(), format!("Basic {token}"));
            }
        }

        if let Some(login) = config.impersonate_user() {
            default_headers.insert(SWITCH_USER_HEADER.to_string(), login.to_string());
        }

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            base_url: config.url().clone(),
            default_headers,
        })
    }

    /// Returns the server URL requests are sent to.
    #[must_use]
    pub const fn base_url(&self) -> &ServerUrl {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Makes subsequent requests on behalf of `login`.
    ///
    /// The server only honours this for administrator credentials.
    pub fn start_impersonate_user(&mut self, login: impl Into<String>) {
        let login = login.into();
        tracing::debug!("Impersonating user {}", login);
        self.default_headers
            .insert(SWITCH_USER_HEADER.to_string(), login);
    }

    /// Stops impersonating; requests are made as the authenticated user again.
    pub fn stop_impersonate_user(&mut self) {
        if self.default_headers.remove(SWITCH_USER_HEADER).is_some() {
            tracing::debug!("Stopped impersonating user");
        }
    }

    /// Returns the impersonated login, if any.
    #[must_use]
    pub fn impersonated_user(&self) -> Option<&str> {
        self.default_headers
            .get(SWITCH_USER_HEADER)
            .map(String::as_str)
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

impl HttpTransport for HttpClient {
    /// Sends an HTTP request to the Redmine server.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - A network error occurs (`Network`)
    ///
    /// Non-2xx responses are returned as `Ok`.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.base_url.join(&request.path);

        let mut headers = self.default_headers.clone();
        if let Some(body_type) = &request.body_type {
            headers.insert(
                "Content-Type".to_string(),
                body_type.as_content_type().to_string(),
            );
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        tracing::debug!("Sending {} request to {}", request.http_method, request.path);

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let bytes = res.bytes().await?.to_vec();

        tracing::debug!("Received {} from {}", code, request.path);

        Ok(HttpResponse::from_bytes(code, res_headers, bytes))
    }
}
