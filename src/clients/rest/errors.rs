//! REST-specific error types.
//!
//! - [`RestError::InvalidPath`]: the path is empty after normalization
//! - [`RestError::Api`]: the request was attempted and failed
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_api::clients::rest::{RestClient, RestError};
//!
//! match client.get("products/unknown", None).await {
//!     Ok(response) => println!("Product: {}", response.body),
//!     Err(RestError::InvalidPath { path }) => println!("Invalid path: {path}"),
//!     Err(RestError::Api(e)) if e.status() == Some(404) => println!("Not found"),
//!     Err(RestError::Api(e)) => println!("Request failed: {e}"),
//! }
//! ```

use crate::clients::{ApiError, InvalidHttpRequestError};
use thiserror::Error;

/// Error type for REST API operations.
///
/// # Example
///
/// ```rust
/// use catalog_api::clients::rest::RestError;
///
/// let error = RestError::InvalidPath { path: "/".to_string() };
/// assert_eq!(error.to_string(), "Invalid REST API path: /");
/// ```
#[derive(Debug, Error)]
pub enum RestError {
    /// The REST API path is empty after stripping leading slashes.
    #[error("Invalid REST API path: {path}")]
    InvalidPath {
        /// The path that was provided.
        path: String,
    },

    /// The request failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl RestError {
    /// Returns the HTTP status of the failed request, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidPath { .. } => None,
            Self::Api(error) => error.status(),
        }
    }
}

impl From<InvalidHttpRequestError> for RestError {
    fn from(error: InvalidHttpRequestError) -> Self {
        Self::Api(error.into())
    }
}
