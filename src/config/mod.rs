//! Configuration types for the Redmine API client.
//!
//! # Overview
//!
//! - [`RedmineConfig`]: server URL, credentials and request identity
//! - [`RedmineConfigBuilder`]: a builder for constructing [`RedmineConfig`]
//! - [`ApiKey`]: a validated API key with masked debug output
//! - [`Password`]: a validated basic-auth password with masked debug output
//! - [`ServerUrl`]: a validated `http`/`https` server URL
//! - [`Credentials`]: API key or basic authentication
//!
//! # Example
//!
//! ```rust
//! use redmine_api::{ApiKey, RedmineConfig, ServerUrl};
//!
//! let config = RedmineConfig::builder()
//!     .url(ServerUrl::new("https://redmine.example.com").unwrap())
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::{ApiKey, Credentials, Password, ServerUrl};

use crate::error::ConfigError;

/// Configuration for a Redmine API client.
///
/// `RedmineConfig` is `Clone`, `Send`, and `Sync`, so one configuration can
/// back several clients.
///
/// # Example
///
/// ```rust
/// use redmine_api::{Password, RedmineConfig, ServerUrl};
///
/// let config = RedmineConfig::builder()
///     .url(ServerUrl::new("https://redmine.example.com").unwrap())
///     .basic_auth("admin", Password::new("secret").unwrap())
///     .impersonate_user("jsmith")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.impersonate_user(), Some("jsmith"));
/// ```
#[derive(Clone, Debug)]
pub struct RedmineConfig {
    url: ServerUrl,
    credentials: Credentials,
    impersonate_user: Option<String>,
    user_agent_prefix: Option<String>,
}

impl RedmineConfig {
    /// Creates a new builder for constructing a `RedmineConfig`.
    #[must_use]
    pub fn builder() -> RedmineConfigBuilder {
        RedmineConfigBuilder::new()
    }

    /// Returns the server URL.
    #[must_use]
    pub const fn url(&self) -> &ServerUrl {
        &self.url
    }

    /// Returns the credentials used for every request.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the login requests are initially made on behalf of, if any.
    #[must_use]
    pub fn impersonate_user(&self) -> Option<&str> {
        self.impersonate_user.as_deref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify RedmineConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RedmineConfig>();
};

/// Builder for constructing [`RedmineConfig`] instances.
///
/// `url` and one of `api_key` / `basic_auth` are required. When both
/// credential kinds are set, the last one wins.
#[derive(Debug, Default)]
pub struct RedmineConfigBuilder {
    url: Option<ServerUrl>,
    credentials: Option<Credentials>,
    username: Option<String>,
    impersonate_user: Option<String>,
    user_agent_prefix: Option<String>,
}

impl RedmineConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server URL (required).
    #[must_use]
    pub fn url(mut self, url: ServerUrl) -> Self {
        self.url = Some(url);
        self
    }

    /// Authenticates with an API key.
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.credentials = Some(Credentials::ApiKey(key));
        self.username = None;
        self
    }

    /// Authenticates with HTTP basic authentication.
    #[must_use]
    pub fn basic_auth(mut self, username: impl Into<String>, password: Password) -> Self {
        let username = username.into();
        self.credentials = Some(Credentials::Basic {
            username: username.clone(),
            password,
        });
        self.username = Some(username);
        self
    }

    /// Makes requests on behalf of another user (`X-Redmine-Switch-User`).
    ///
    /// Only honoured by the server for administrator credentials.
    #[must_use]
    pub fn impersonate_user(mut self, login: impl Into<String>) -> Self {
        self.impersonate_user = Some(login.into());
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`RedmineConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `url` or the
    /// credentials are not set, and [`ConfigError::EmptyUsername`] for a
    /// blank basic-auth login.
    pub fn build(self) -> Result<RedmineConfig, ConfigError> {
        let url = self
            .url
            .ok_or(ConfigError::MissingRequiredField { field: "url" })?;
        let credentials = self.credentials.ok_or(ConfigError::MissingRequiredField {
            field: "credentials",
        })?;

        if self
            .username
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(ConfigError::EmptyUsername);
        }

        Ok(RedmineConfig {
            url,
            credentials,
            impersonate_user: self.impersonate_user.filter(|login| !login.is_empty()),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
