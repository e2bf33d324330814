//! # Catalog API Rust Client
//!
//! A Rust client for catalog-management (PIM) REST APIs, handling the token
//! lifecycle, transient-failure retry, rate-limit backoff, and result-set
//! pagination.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`CatalogConfig`] and [`CatalogConfigBuilder`]
//! - Validated newtypes for the endpoint and account credentials
//! - Password-grant token exchange and a token cache with single-flight refresh
//! - An async request executor with retry, backoff and rate-limit handling
//! - Errors whose diagnostics have credentials masked
//! - Link-following pagination and typed catalog resources
//!
//! ## Quick Start
//!
//! ```rust
//! use catalog_api::{CatalogConfig, ClientId, ClientSecret, Endpoint, Password, RetryPolicy, Username};
//!
//! let config = CatalogConfig::builder()
//!     .endpoint(Endpoint::new("https://pim.example.com").unwrap())
//!     .client_id(ClientId::new("client-id").unwrap())
//!     .client_secret(ClientSecret::new("client-secret").unwrap())
//!     .username(Username::new("api-user").unwrap())
//!     .password(Password::new("api-password").unwrap())
//!     .retry(RetryPolicy::new(3, 500).with_jitter(true))
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use catalog_api::RestClient;
//! use catalog_api::rest::CatalogResource;
//! use catalog_api::rest::resources::Product;
//!
//! let client = RestClient::new(&config)?;
//!
//! // The first call exchanges the account credentials for a token;
//! // later calls reuse it until it is about to expire.
//! let response = client.get("products/tshirt-red", None).await?;
//!
//! // Every product, following `next` links until the last page
//! let products = Product::list_all(&client, None).await?;
//! ```
//!
//! ## Error Handling
//!
//! Every failed request returns an [`ApiError`]. Its [`ErrorKind`] tells
//! transport failures, server errors, rate limiting, client errors and token
//! exchange failures apart, and its serialized form is safe to log:
//!
//! ```rust,ignore
//! use catalog_api::ErrorKind;
//!
//! match client.get("products/unknown", None).await {
//!     Ok(response) => println!("{}", response.body),
//!     Err(e) if e.status() == Some(404) => println!("Not found"),
//!     Err(e) => tracing::error!(error = %serde_json::to_string(&e).unwrap_or_default()),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: each client owns its token cache
//! - **Fail-fast validation**: configuration is validated once, at construction
//! - **Thread-safe**: clients are `Send + Sync` and can be shared with `Arc`
//! - **Async-first**: designed for use with the Tokio runtime

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use auth::{Credential, CredentialExchanger, TokenCache};
pub use config::{
    CatalogConfig, CatalogConfigBuilder, ClientId, ClientSecret, Endpoint, Password, Username,
};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ApiError, ErrorKind, HttpClient, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    InvalidHttpRequestError, RestClient, RestError, RetryPolicy,
};

// Re-export pagination types
pub use rest::{drain, PagedResult};
