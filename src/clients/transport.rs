//! The network seam between the client and the HTTP library.
//!
//! A [`Transport`] performs exactly one HTTP exchange. Its failures come back
//! as a tagged [`TransportError`] so that retry decisions can be made on the
//! tag alone. [`ReqwestTransport`] is the production implementation; tests
//! and callers with special networking needs can supply their own.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::clients::http_request::HttpMethod;
use crate::clients::http_response::HttpResponse;

/// A fully resolved request: absolute URL and final headers.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The absolute URL. The query string is kept apart in `query`.
    pub url: String,
    /// Final request headers, one value per name.
    pub headers: Vec<(String, String)>,
    /// Query parameters, in the order they will be sent.
    pub query: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
}

impl PreparedRequest {
    /// Creates a request with no headers, query or body.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Sets a header, replacing any existing header with the same name
    /// regardless of case.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    /// Returns the value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Why a single HTTP exchange failed.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The exchange never completed: DNS failure, refused connection,
    /// reset, or timeout. No response was received.
    #[error("connection failed: {message}")]
    Connection {
        /// Description from the HTTP library.
        message: String,
    },

    /// A response was received with a non-2xx status.
    #[error("received status {}", .0.code)]
    Status(HttpResponse),

    /// Any failure that does not fit the shapes above.
    #[error("unexpected transport failure: {message}")]
    Other {
        /// Description of the failure.
        message: String,
    },
}

/// Performs one HTTP exchange.
///
/// Implementations must return `Ok` only for 2xx responses and report every
/// other status as [`TransportError::Status`].
pub trait Transport: Send + Sync + fmt::Debug {
    /// Sends the request and waits for the response.
    fn send<'a>(
        &'a self,
        request: &'a PreparedRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>>;
}

/// [`Transport`] backed by a `reqwest` client with a per-request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the client cannot be initialized
    /// (e.g., TLS backend failure).
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    fn method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }

    async fn execute(&self, request: &PreparedRequest) -> Result<HttpResponse, TransportError> {
        let mut req_builder = self
            .client
            .request(Self::method(request.method), &request.url);

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }
        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        // reqwest errors quote the full URL, query string included
        let res = req_builder.send().await.map_err(|e| {
            let is_builder = e.is_builder();
            let message = e.without_url().to_string();
            if is_builder {
                TransportError::Other { message }
            } else {
                TransportError::Connection { message }
            }
        })?;

        let code = res.status().as_u16();
        let headers = parse_response_headers(res.headers());
        let body_text = res.text().await.map_err(|e| TransportError::Other {
            message: format!("failed to read response body: {}", e.without_url()),
        })?;

        let body = if body_text.trim().is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(&body_text)
                .unwrap_or_else(|_| serde_json::json!({ "raw_body": body_text }))
        };

        let response = HttpResponse::new(code, headers, body);
        if response.is_ok() {
            Ok(response)
        } else {
            Err(TransportError::Status(response))
        }
    }
}

impl Transport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: &'a PreparedRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(self.execute(request))
    }
}

/// Parses response headers into a `HashMap` keyed by lower-cased name.
fn parse_response_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, Vec<String>> {
    let mut result: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers {
        let key = name.as_str().to_lowercase();
        let value = value.to_str().unwrap_or_default().to_string();
        result.entry(key).or_default().push(value);
    }
    result
}
