//! Configuration types for the catalog API client.
//!
//! # Overview
//!
//! - [`CatalogConfig`]: all settings needed to talk to one catalog server
//! - [`CatalogConfigBuilder`]: builder that validates and applies defaults once
//! - [`Endpoint`], [`ClientId`], [`ClientSecret`], [`Username`], [`Password`]:
//!   validated newtypes
//!
//! # Example
//!
//! ```rust
//! use catalog_api::{CatalogConfig, ClientId, ClientSecret, Endpoint, Password, Username};
//!
//! let config = CatalogConfig::builder()
//!     .endpoint(Endpoint::new("https://pim.example.com").unwrap())
//!     .client_id(ClientId::new("client-id").unwrap())
//!     .client_secret(ClientSecret::new("client-secret").unwrap())
//!     .username(Username::new("api-user").unwrap())
//!     .password(Password::new("api-password").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.timeout_ms(), 5000);
//! assert_eq!(config.refresh_if_within_secs(), 1800);
//! ```

mod newtypes;

pub use newtypes::{ClientId, ClientSecret, Endpoint, Password, Username};

use std::time::Duration;

use crate::clients::RetryPolicy;
use crate::error::ConfigError;

/// Default per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default token refresh lookahead window in seconds.
pub const DEFAULT_REFRESH_IF_WITHIN_SECS: u64 = 1800;

/// Configuration for one catalog API connection.
///
/// Defaults are resolved by [`CatalogConfigBuilder::build`] and never
/// re-derived afterwards.
///
/// # Thread Safety
///
/// `CatalogConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    endpoint: Endpoint,
    client_id: ClientId,
    client_secret: ClientSecret,
    username: Username,
    password: Password,
    timeout_ms: u64,
    retry: RetryPolicy,
    refresh_if_within_secs: u64,
    user_agent_prefix: Option<String>,
}

impl CatalogConfig {
    /// Creates a new builder for constructing a `CatalogConfig`.
    #[must_use]
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::new()
    }

    /// Returns the server endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the client identifier.
    #[must_use]
    pub const fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Returns the client secret.
    #[must_use]
    pub const fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }

    /// Returns the API username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the API password.
    #[must_use]
    pub const fn password(&self) -> &Password {
        &self.password
    }

    /// Returns the per-request timeout in milliseconds.
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Returns the per-request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the client-level retry policy.
    #[must_use]
    pub const fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Returns how many seconds before expiry a token is considered stale.
    #[must_use]
    pub const fn refresh_if_within_secs(&self) -> u64 {
        self.refresh_if_within_secs
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify CatalogConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CatalogConfig>();
};

/// Builder for constructing [`CatalogConfig`] instances.
///
/// Required fields are `endpoint`, `client_id`, `client_secret`, `username`
/// and `password`.
///
/// # Defaults
///
/// - `timeout_ms`: 5000
/// - `retry`: [`RetryPolicy::default`] (no retries, five 429 retries)
/// - `refresh_if_within_secs`: 1800
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct CatalogConfigBuilder {
    endpoint: Option<Endpoint>,
    client_id: Option<ClientId>,
    client_secret: Option<ClientSecret>,
    username: Option<Username>,
    password: Option<Password>,
    timeout_ms: Option<u64>,
    retry: Option<RetryPolicy>,
    refresh_if_within_secs: Option<u64>,
    user_agent_prefix: Option<String>,
}

impl CatalogConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server endpoint (required).
    #[must_use]
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the client identifier (required).
    #[must_use]
    pub fn client_id(mut self, id: ClientId) -> Self {
        self.client_id = Some(id);
        self
    }

    /// Sets the client secret (required).
    #[must_use]
    pub fn client_secret(mut self, secret: ClientSecret) -> Self {
        self.client_secret = Some(secret);
        self
    }

    /// Sets the API username (required).
    #[must_use]
    pub fn username(mut self, username: Username) -> Self {
        self.username = Some(username);
        self
    }

    /// Sets the API password (required).
    #[must_use]
    pub fn password(mut self, password: Password) -> Self {
        self.password = Some(password);
        self
    }

    /// Sets the per-request timeout in milliseconds.
    #[must_use]
    pub const fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Sets the client-level retry policy.
    #[must_use]
    pub const fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Sets the token refresh lookahead window in seconds.
    #[must_use]
    pub const fn refresh_if_within_secs(mut self, secs: u64) -> Self {
        self.refresh_if_within_secs = Some(secs);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`CatalogConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if a required field is
    /// not set, or [`ConfigError::InvalidTimeout`] if the timeout is zero.
    pub fn build(self) -> Result<CatalogConfig, ConfigError> {
        let endpoint = self
            .endpoint
            .ok_or(ConfigError::MissingRequiredField { field: "endpoint" })?;
        let client_id = self
            .client_id
            .ok_or(ConfigError::MissingRequiredField { field: "client_id" })?;
        let client_secret = self.client_secret.ok_or(ConfigError::MissingRequiredField {
            field: "client_secret",
        })?;
        let username = self
            .username
            .ok_or(ConfigError::MissingRequiredField { field: "username" })?;
        let password = self
            .password
            .ok_or(ConfigError::MissingRequiredField { field: "password" })?;

        let timeout_ms = self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(CatalogConfig {
            endpoint,
            client_id,
            client_secret,
            username,
            password,
            timeout_ms,
            retry: self.retry.unwrap_or_default(),
            refresh_if_within_secs: self
                .refresh_if_within_secs
                .unwrap_or(DEFAULT_REFRESH_IF_WITHIN_SECS),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
