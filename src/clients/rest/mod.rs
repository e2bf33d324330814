//! REST client for the catalog API.
//!
//! This module provides a higher-level client built on top of the
//! [`HttpClient`](crate::clients::HttpClient) that offers one method per
//! HTTP verb and helpers for paged list endpoints.
//!
//! # Overview
//!
//! - [`RestClient`]: `get()`, `post()`, `patch()`, `put()`, `delete()`,
//!   `get_page()` and `get_all()`
//! - [`RestError`]: Error type for REST API operations
//!
//! # Path Normalization
//!
//! Paths are relative to `{endpoint}/api/rest/v1/`. Leading slashes are
//! stripped (`/products` becomes `products`), and a path that is empty
//! afterwards is rejected with [`RestError::InvalidPath`].

mod client;
mod errors;

pub use client::RestClient;
pub use errors::RestError;
