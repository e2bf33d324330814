//! Error types for catalog API requests.
//!
//! Every failure of a request, including token acquisition, surfaces as an
//! [`ApiError`]. Its [`ErrorKind`] tells callers which part of the taxonomy
//! it belongs to:
//!
//! - [`ErrorKind::Transport`]: no response was received
//! - [`ErrorKind::Server`]: 5xx response
//! - [`ErrorKind::RateLimit`]: 429 response after the rate-limit budget ran out
//! - [`ErrorKind::Client`]: any other non-2xx response, never retried
//! - [`ErrorKind::CredentialExchange`]: the token could not be obtained
//! - [`ErrorKind::Decode`]: a 2xx body did not match the expected shape
//! - [`ErrorKind::InvalidRequest`]: the request failed validation
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_api::clients::ErrorKind;
//!
//! match client.get("products/unknown", None).await {
//!     Ok(response) => println!("Product: {}", response.body),
//!     Err(e) if e.status() == Some(404) => println!("No such product"),
//!     Err(e) if e.kind() == ErrorKind::RateLimit => println!("Slow down: {e}"),
//!     Err(e) => eprintln!("{}", serde_json::to_string(&e).unwrap()),
//! }
//! ```

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::clients::masking::{mask_json, RequestSnapshot};
use crate::clients::transport::{PreparedRequest, TransportError};

/// Which part of the error taxonomy an [`ApiError`] belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Connection-level failure; no response received.
    Transport,
    /// The server answered with a 5xx status.
    Server,
    /// The server answered with 429 Too Many Requests.
    RateLimit,
    /// The server answered with any other non-2xx status.
    Client,
    /// The access token could not be obtained.
    CredentialExchange,
    /// A successful response body could not be decoded.
    Decode,
    /// The request failed validation before being sent.
    InvalidRequest,
}

/// Error returned when a request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST, PATCH or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The request path is empty.
    #[error("Request path cannot be empty.")]
    EmptyPath,

    /// An absolute URL without an http(s) scheme.
    #[error("Invalid request URL '{url}'. Expected an absolute http(s) URL.")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
    },

    /// The request body could not be serialized to JSON.
    #[error("Cannot serialize request body: {reason}")]
    UnserializableBody {
        /// The serializer's error message.
        reason: String,
    },
}

/// The error returned by every request made through this crate.
///
/// `ApiError` is immutable once constructed. Its diagnostic snapshot has
/// credentials masked, so the whole error (including its `Serialize` output)
/// is safe to log.
#[derive(Clone, Debug, Error, Serialize)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
    attempts: u32,
    request: Option<RequestSnapshot>,
    response_body: Option<Value>,
}

impl ApiError {
    /// Converts a transport failure into an `ApiError`.
    ///
    /// `attempts` is the number of attempts made for the logical request.
    #[must_use]
    pub fn from_transport(error: TransportError, request: &PreparedRequest, attempts: u32) -> Self {
        let target = format!("{} {}", request.method.as_str(), request.url);
        let (kind, message, status, body) = match error {
            TransportError::Connection { message } => (
                ErrorKind::Transport,
                format!("{target} failed: {message}"),
                None,
                None,
            ),
            TransportError::Other { message } => (
                ErrorKind::Transport,
                format!("{target} failed unexpectedly: {message}"),
                None,
                None,
            ),
            TransportError::Status(response) => {
                let kind = match response.code {
                    429 => ErrorKind::RateLimit,
                    500..=599 => ErrorKind::Server,
                    _ => ErrorKind::Client,
                };
                let message = response.error_message().map_or_else(
                    || format!("{target} returned status {}", response.code),
                    |detail| format!("{target} returned status {}: {detail}", response.code),
                );
                (kind, message, Some(response.code), Some(response.body))
            }
        };

        Self::new(kind, message, status, attempts, Some(request), body)
    }

    /// Creates an error for a failed token exchange.
    #[must_use]
    pub fn credential_exchange(
        message: impl Into<String>,
        status: Option<u16>,
        request: Option<&PreparedRequest>,
        response_body: Option<Value>,
    ) -> Self {
        Self::new(
            ErrorKind::CredentialExchange,
            format!("Token exchange failed: {}", message.into()),
            status,
            1,
            request,
            response_body,
        )
    }

    /// Creates an error for a 2xx body that could not be decoded.
    ///
    /// `status` and `attempts` describe the exchange that produced the body.
    #[must_use]
    pub fn decode(
        error: &serde_json::Error,
        request: &PreparedRequest,
        status: u16,
        attempts: u32,
    ) -> Self {
        let target = format!("{} {}", request.method.as_str(), request.url);
        Self::new(
            ErrorKind::Decode,
            format!("{target} returned an undecodable body: {error}"),
            Some(status),
            attempts,
            Some(request),
            None,
        )
    }

    fn new(
        kind: ErrorKind,
        message: String,
        status: Option<u16>,
        attempts: u32,
        request: Option<&PreparedRequest>,
        response_body: Option<Value>,
    ) -> Self {
        let message = if attempts > 1 {
            format!("{message} (after {attempts} attempts)")
        } else {
            message
        };

        Self {
            kind,
            message,
            status,
            attempts,
            request: request.map(RequestSnapshot::masked),
            response_body: response_body.as_ref().map(mask_json),
        }
    }

    /// Returns which part of the taxonomy this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status, if a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns how many attempts were made before giving up.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns the masked snapshot of the request that failed.
    #[must_use]
    pub const fn request(&self) -> Option<&RequestSnapshot> {
        self.request.as_ref()
    }

    /// Returns the masked response body, if a response was received.
    #[must_use]
    pub const fn response_body(&self) -> Option<&Value> {
        self.response_body.as_ref()
    }

    /// Returns `true` if the error may go away when the request is retried.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Transport | ErrorKind::Server | ErrorKind::RateLimit
        )
    }

    /// Returns `true` if `error` belongs to this crate's error taxonomy.
    ///
    /// Useful once the error has been boxed or wrapped by the caller.
    #[must_use]
    pub fn is_api_error(error: &(dyn std::error::Error + 'static)) -> bool {
        error.is::<Self>()
    }
}

impl From<InvalidHttpRequestError> for ApiError {
    fn from(error: InvalidHttpRequestError) -> Self {
        Self::new(
            ErrorKind::InvalidRequest,
            error.to_string(),
            None,
            0,
            None,
            None,
        )
    }
}
