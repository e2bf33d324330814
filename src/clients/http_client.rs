//! Request executor for the catalog API.
//!
//! This module provides the [`HttpClient`] type, which turns one logical
//! request into one or more HTTP exchanges: it attaches a current bearer
//! token, sends the request through a [`Transport`], and retries transient
//! failures and rate-limit responses according to the effective
//! [`RetryPolicy`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::auth::{Credential, CredentialExchanger, CredentialSource, TokenCache};
use crate::clients::errors::ApiError;
use crate::clients::http_request::{HttpRequest, RequestTarget};
use crate::clients::http_response::HttpResponse;
use crate::clients::retry::{retry_delay, FailureKind, RetryPolicy};
use crate::clients::transport::{PreparedRequest, ReqwestTransport, Transport};
use crate::config::CatalogConfig;
use crate::error::ConfigError;

/// Path of the REST API, relative to the server endpoint.
pub const REST_BASE_PATH: &str = "/api/rest/v1";

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Headers owned by the client that callers may not override.
const RESERVED_HEADERS: [&str; 2] = ["authorization", "content-type"];

/// Authenticated HTTP client for the catalog REST API.
///
/// The client handles:
/// - Token acquisition through its [`TokenCache`], re-checked before every attempt
/// - Default headers (`User-Agent`, `Accept`) and the bearer `Authorization` header
/// - Retries of connection failures and 5xx responses with exponential backoff
/// - Retries of 429 responses against a separate budget, honoring `Retry-After`
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`. Share it across tasks with `Arc`; all
/// clones of the `Arc` share one token cache.
///
/// # Example
///
/// ```rust,ignore
/// use catalog_api::clients::{HttpClient, HttpMethod, HttpRequest};
///
/// let client = HttpClient::new(&config)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "products/tshirt-red")
///     .build()
///     .unwrap();
///
/// let response = client.execute(request).await?;
/// println!("Product: {}", response.body);
/// ```
#[derive(Debug)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    tokens: TokenCache,
    /// Base URL for relative paths (e.g., `https://pim.example.com/api/rest/v1`).
    base_url: String,
    default_headers: HashMap<String, String>,
    retry_policy: RetryPolicy,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a client that talks to the server in `config` over HTTPS.
    ///
    /// No network activity happens until the first request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the underlying HTTP client
    /// cannot be initialized (e.g., TLS backend failure).
    pub fn new(config: &CatalogConfig) -> Result<Self, ConfigError> {
        let transport =
            ReqwestTransport::new(config.timeout()).map_err(|e| ConfigError::HttpClient {
                reason: e.to_string(),
            })?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client that sends both token and API requests through
    /// `transport`.
    #[must_use]
    pub fn with_transport(config: &CatalogConfig, transport: Arc<dyn Transport>) -> Self {
        let exchanger = CredentialExchanger::new(config, Arc::clone(&transport));
        Self::with_credential_source(config, transport, Arc::new(exchanger))
    }

    /// Creates a client that obtains its tokens from `source`.
    #[must_use]
    pub fn with_credential_source(
        config: &CatalogConfig,
        transport: Arc<dyn Transport>,
        source: Arc<dyn CredentialSource>,
    ) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}Catalog API Rust Client v{SDK_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        Self {
            transport,
            tokens: TokenCache::new(source, config.refresh_if_within_secs()),
            base_url: config.endpoint().join(REST_BASE_PATH),
            default_headers,
            retry_policy: config.retry().clone(),
        }
    }

    /// Returns the base URL that relative paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the client-level retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the token cache backing this client.
    #[must_use]
    pub const fn token_cache(&self) -> &TokenCache {
        &self.tokens
    }

    /// Returns a valid access credential, refreshing it if needed.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] of kind `CredentialExchange` if the token
    /// could not be obtained.
    pub async fn get_token(&self) -> Result<Arc<Credential>, ApiError> {
        self.tokens.get_token().await
    }

    /// Executes one logical request and returns the successful response.
    ///
    /// Attempts are strictly sequential. Before every attempt the token cache
    /// is consulted, so a token refreshed in the meantime is picked up.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the request fails validation (nothing is sent)
    /// - `CredentialExchange` if the token cannot be obtained (not retried)
    /// - `Client` for a non-retryable status, raised after one attempt
    /// - `Transport`, `Server` or `RateLimit` once the applicable retry budget
    ///   is exhausted, carrying the last failure
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.execute_with_retries(request)
            .await
            .map(|(response, _, _)| response)
    }

    /// Executes a request and deserializes the response body into `T`.
    ///
    /// # Errors
    ///
    /// Everything [`execute`](Self::execute) returns, plus `Decode` if the
    /// body does not match `T`. A `Decode` error carries the status, the
    /// attempt count and the masked request like any other.
    pub async fn execute_json<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, ApiError> {
        let (response, prepared, attempts) = self.execute_with_retries(request).await?;
        T::deserialize(&response.body)
            .map_err(|e| ApiError::decode(&e, &prepared, response.code, attempts))
    }

    /// Runs the retry loop and returns the response together with the
    /// request of the successful attempt and the number of attempts made.
    async fn execute_with_retries(
        &self,
        request: HttpRequest,
    ) -> Result<(HttpResponse, PreparedRequest, u32), ApiError> {
        request.verify()?;

        let policy = request.retry_policy.as_ref().unwrap_or(&self.retry_policy);
        let url = self.resolve_url(&request.target);

        let mut attempts: u32 = 0;
        let mut transient_retries: u32 = 0;
        let mut rate_limit_retries: u32 = 0;

        loop {
            attempts += 1;

            let credential = self.tokens.get_token().await?;
            let prepared = self.prepare(&request, &url, &credential);

            tracing::debug!(
                method = request.http_method.as_str(),
                url = %prepared.url,
                attempt = attempts,
                "Sending request"
            );

            let error = match self.transport.send(&prepared).await {
                Ok(response) => return Ok((response, prepared, attempts)),
                Err(error) => error,
            };

            let failure = FailureKind::classify(&error);
            let retry = match failure {
                FailureKind::RateLimited { .. } if rate_limit_retries < policy.max_429_retries => {
                    rate_limit_retries += 1;
                    Some(rate_limit_retries)
                }
                FailureKind::Transient if transient_retries < policy.max_retries => {
                    transient_retries += 1;
                    Some(transient_retries)
                }
                _ => None,
            };

            let Some(delay) = retry.and_then(|n| retry_delay(policy, failure, n)) else {
                return Err(ApiError::from_transport(error, &prepared, attempts));
            };

            if matches!(failure, FailureKind::RateLimited { .. }) {
                tracing::warn!(
                    url = %prepared.url,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    retry = rate_limit_retries,
                    "Rate limited, waiting before retry"
                );
            } else {
                tracing::warn!(
                    url = %url,
                    error = %error,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    retry = transient_retries,
                    "Request failed, retrying"
                );
            }

            tokio::time::sleep(delay).await;
        }
    }

    fn resolve_url(&self, target: &RequestTarget) -> String {
        match target {
            RequestTarget::Path(path) => {
                format!("{}/{}", self.base_url, path.trim_start_matches('/'))
            }
            RequestTarget::Url(url) => url.clone(),
        }
    }

    /// Builds the request as it goes on the wire for one attempt.
    ///
    /// A query string already present in `url` (as in pagination links) is
    /// moved into `query`, ahead of the request's own parameters, so that
    /// masking sees every parameter.
    fn prepare(&self, request: &HttpRequest, url: &str, credential: &Credential) -> PreparedRequest {
        let (url, link_query) = split_query(url);
        let mut prepared = PreparedRequest::new(request.http_method, url);
        prepared.query = link_query;

        for (name, value) in &self.default_headers {
            prepared.set_header(name.clone(), value.clone());
        }

        if let Some(extra) = &request.extra_headers {
            for (name, value) in extra {
                if RESERVED_HEADERS
                    .iter()
                    .any(|reserved| reserved.eq_ignore_ascii_case(name))
                {
                    tracing::debug!(header = %name, "Ignoring caller-supplied reserved header");
                    continue;
                }
                prepared.set_header(name.clone(), value.clone());
            }
        }

        prepared.set_header(
            "Authorization",
            format!("Bearer {}", credential.access_token()),
        );

        if let Some(body) = &request.body {
            prepared.set_header("Content-Type", "application/json");
            prepared.body = Some(body.clone());
        }

        if let Some(query) = &request.query {
            let mut pairs: Vec<(String, String)> = query
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            pairs.sort();
            prepared.query.extend(pairs);
        }

        prepared
    }
}

/// Splits `url` into its base and its decoded query pairs. The fragment is
/// dropped.
fn split_query(url: &str) -> (&str, Vec<(String, String)>) {
    let Some((base, query)) = url.split_once('?') else {
        return (url.split('#').next().unwrap_or(url), Vec::new());
    };
    let query = query.split('#').next().unwrap_or_default();

    let pairs = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_query_component(key), decode_query_component(value))
        })
        .collect();
    (base, pairs)
}

fn decode_query_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    let decoded = urlencoding::decode(&spaced).map(std::borrow::Cow::into_owned);
    decoded.unwrap_or(spaced)
}
