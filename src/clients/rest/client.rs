//! REST client for the catalog API.
//!
//! This module provides the [`RestClient`] type, a thin layer over
//! [`HttpClient`] with one method per HTTP verb, path normalization, and
//! helpers for paged list endpoints.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::clients::rest::RestError;
use crate::clients::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
use crate::config::CatalogConfig;
use crate::error::ConfigError;
use crate::rest::{drain, PagedResult};

/// REST API client for the catalog API.
///
/// Provides convenient methods (`get`, `post`, `patch`, `put`, `delete`)
/// and paged helpers (`get_page`, `get_all`). Paths are relative to
/// `{endpoint}/api/rest/v1/`.
///
/// # Thread Safety
///
/// `RestClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use catalog_api::RestClient;
///
/// let client = RestClient::new(&config)?;
///
/// // GET request
/// let response = client.get("products/tshirt-red", None).await?;
///
/// // PATCH request with body
/// let body = serde_json::json!({"enabled": false});
/// let response = client.patch("products/tshirt-red", body, None).await?;
///
/// // Every category, across all pages
/// let categories = client.get_all::<serde_json::Value>("categories", None).await?;
/// ```
#[derive(Debug)]
pub struct RestClient {
    http_client: HttpClient,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a new REST client for the server in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the HTTP client cannot be
    /// initialized.
    pub fn new(config: &CatalogConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_http_client(HttpClient::new(config)?))
    }

    /// Wraps an existing [`HttpClient`].
    #[must_use]
    pub const fn from_http_client(http_client: HttpClient) -> Self {
        Self { http_client }
    }

    /// Returns the underlying request executor.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Sends a GET request to the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The REST API path (e.g., "products", "categories/shoes")
    /// * `query` - Optional query parameters
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is empty.
    /// Returns [`RestError::Api`] if the request fails.
    pub async fn get(
        &self,
        path: &str,
        query: Option<HashMap<String, String>>,
    ) -> Result<HttpResponse, RestError> {
        self.make_request(HttpMethod::Get, path, None, query, None)
            .await
    }

    /// Sends a GET request with a retry policy replacing the client default.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is empty.
    /// Returns [`RestError::Api`] if the request fails after all retries.
    pub async fn get_with_retry(
        &self,
        path: &str,
        query: Option<HashMap<String, String>>,
        policy: RetryPolicy,
    ) -> Result<HttpResponse, RestError> {
        self.make_request(HttpMethod::Get, path, None, query, Some(policy))
            .await
    }

    /// Sends a POST request to the specified path.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is empty.
    /// Returns [`RestError::Api`] if the request fails.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let body = serde_json::json!({"code": "summer", "parent": "master"});
    /// let response = client.post("categories", body, None).await?;
    /// assert_eq!(response.code, 201);
    /// ```
    pub async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
        query: Option<HashMap<String, String>>,
    ) -> Result<HttpResponse, RestError> {
        self.make_request(HttpMethod::Post, path, Some(body), query, None)
            .await
    }

    /// Sends a PATCH request (create or partial update) to the specified path.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is empty.
    /// Returns [`RestError::Api`] if the request fails.
    pub async fn patch(
        &self,
        path: &str,
        body: serde_json::Value,
        query: Option<HashMap<String, String>>,
    ) -> Result<HttpResponse, RestError> {
        self.make_request(HttpMethod::Patch, path, Some(body), query, None)
            .await
    }

    /// Sends a PUT request to the specified path.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is empty.
    /// Returns [`RestError::Api`] if the request fails.
    pub async fn put(
        &self,
        path: &str,
        body: serde_json::Value,
        query: Option<HashMap<String, String>>,
    ) -> Result<HttpResponse, RestError> {
        self.make_request(HttpMethod::Put, path, Some(body), query, None)
            .await
    }

    /// Sends a DELETE request to the specified path.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is empty.
    /// Returns [`RestError::Api`] if the request fails.
    pub async fn delete(
        &self,
        path: &str,
        query: Option<HashMap<String, String>>,
    ) -> Result<HttpResponse, RestError> {
        self.make_request(HttpMethod::Delete, path, None, query, None)
            .await
    }

    /// Sends a GET request and deserializes the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is empty.
    /// Returns [`RestError::Api`] if the request fails or the body does not
    /// match `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<HashMap<String, String>>,
    ) -> Result<T, RestError> {
        let request = Self::build_request(HttpMethod::Get, path, None, query, None)?;
        Ok(self.http_client.execute_json(request).await?)
    }

    /// Fetches one page of a list endpoint.
    ///
    /// # Errors
    ///
    /// Same as [`get_json`](Self::get_json).
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<HashMap<String, String>>,
    ) -> Result<PagedResult<T>, RestError> {
        self.get_json(path, query).await
    }

    /// Fetches the first page of a list endpoint and follows `next` links
    /// until every item has been collected.
    ///
    /// No page limit is enforced; the walk stops only when the server stops
    /// sending a `next` link.
    ///
    /// # Errors
    ///
    /// Returns the first failing page's error.
    pub async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<HashMap<String, String>>,
    ) -> Result<PagedResult<T>, RestError> {
        let mut result = self.get_page(path, query).await?;
        drain(&self.http_client, &mut result).await?;
        Ok(result)
    }

    async fn make_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
        query: Option<HashMap<String, String>>,
        policy: Option<RetryPolicy>,
    ) -> Result<HttpResponse, RestError> {
        let request = Self::build_request(method, path, body, query, policy)?;
        Ok(self.http_client.execute(request).await?)
    }

    fn build_request(
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
        query: Option<HashMap<String, String>>,
        policy: Option<RetryPolicy>,
    ) -> Result<HttpRequest, RestError> {
        let normalized_path = normalize_path(path)?;

        let mut builder = HttpRequest::builder(method, normalized_path);
        if let Some(body_value) = body {
            builder = builder.body(body_value);
        }
        if let Some(query_params) = query.filter(|q| !q.is_empty()) {
            builder = builder.query(query_params);
        }
        if let Some(policy) = policy {
            builder = builder.retry_policy(policy);
        }

        Ok(builder.build()?)
    }
}

/// Strips leading `/` characters and rejects empty paths.
fn normalize_path(path: &str) -> Result<String, RestError> {
    let normalized = path.trim().trim_start_matches('/');
    if normalized.is_empty() {
        return Err(RestError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(normalized.to_string())
}
