//! Configuration error types for the catalog API client.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that a
//! misconfigured client fails before any network activity takes place.
//!
//! # Example
//!
//! ```rust
//! use catalog_api::{ClientId, ConfigError};
//!
//! let result = ClientId::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyClientId)));
//! ```

use thiserror::Error;

/// Errors that can occur while building a client configuration.
///
/// These are raised synchronously and are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Client identifier cannot be empty.
    #[error("Client ID cannot be empty. Please provide the API connection's client ID.")]
    EmptyClientId,

    /// Client secret cannot be empty.
    #[error("Client secret cannot be empty. Please provide the API connection's secret.")]
    EmptyClientSecret,

    /// Username cannot be empty.
    #[error("Username cannot be empty. Please provide the API user's username.")]
    EmptyUsername,

    /// Password cannot be empty.
    #[error("Password cannot be empty. Please provide the API user's password.")]
    EmptyPassword,

    /// Endpoint URL is invalid.
    #[error("Invalid endpoint URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://pim.example.com').")]
    InvalidEndpoint {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Request timeout must be positive.
    #[error("Invalid timeout: the request timeout must be greater than zero milliseconds.")]
    InvalidTimeout,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The underlying HTTP client could not be created.
    #[error("Failed to initialize the HTTP client: {reason}")]
    HttpClient {
        /// The reason reported by the HTTP library.
        reason: String,
    },
}
