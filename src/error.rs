//! Error types for client configuration.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that
//! invalid settings fail fast, before any request is made.
//!
//! # Example
//!
//! ```rust
//! use redmine_api::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide the key shown on your Redmine account page.")]
    EmptyApiKey,

    /// Username cannot be empty.
    #[error("Username cannot be empty when using basic authentication.")]
    EmptyUsername,

    /// Password cannot be empty.
    #[error("Password cannot be empty when using basic authentication.")]
    EmptyPassword,

    /// Server URL is invalid.
    #[error("Invalid server URL '{url}'. Please provide an http or https URL (e.g., 'https://redmine.example.com').")]
    InvalidServerUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
