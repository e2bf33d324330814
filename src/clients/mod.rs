//! HTTP client types for catalog API communication.
//!
//! This module provides the request-execution layer: building requests,
//! attaching credentials, sending them through a [`Transport`], and retrying
//! failures according to a [`RetryPolicy`].
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The authenticated request executor
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A parsed response from the API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PATCH, PUT, DELETE)
//! - [`RetryPolicy`]: Retry budgets and backoff settings
//! - [`Transport`]: The seam to the network, with [`ReqwestTransport`] as default
//! - [`ApiError`]: The error returned by every request
//! - [`rest::RestClient`]: Higher-level REST client with pagination helpers
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_api::clients::{HttpClient, HttpMethod, HttpRequest, RetryPolicy};
//!
//! let client = HttpClient::new(&config)?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "categories")
//!     .query_param("limit", "100")
//!     .retry_policy(RetryPolicy::new(3, 250).with_jitter(true))
//!     .build()
//!     .unwrap();
//!
//! let response = client.execute(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! - **Connection failures and 500-504**: retried up to `max_retries` times,
//!   waiting `base_delay_ms * 2^(n-1)` (optionally jittered) before retry `n`
//! - **429 (Rate Limited)**: retried up to `max_429_retries` times, waiting
//!   for `Retry-After` seconds or 5 seconds if the header is absent
//! - **Any other status**: returned immediately without retry
//!
//! The default policy makes no transient retries and up to five 429 retries.

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod masking;
pub mod rest;
mod retry;
mod transport;

pub use errors::{ApiError, ErrorKind, InvalidHttpRequestError};
pub use http_client::{HttpClient, REST_BASE_PATH, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, RequestTarget};
pub use http_response::HttpResponse;
pub use masking::{mask_json, RequestSnapshot, MASK};
pub use retry::{
    exponential_delay_ms, rate_limit_delay, retry_delay, retry_delay_with_rng, FailureKind,
    RetryPolicy, DEFAULT_MAX_429_RETRIES, DEFAULT_RATE_LIMIT_DELAY_MS, RETRYABLE_STATUS_CODES,
};
pub use transport::{PreparedRequest, ReqwestTransport, Transport, TransportError};

// Re-export REST client types at the clients module level
pub use rest::{RestClient, RestError};
