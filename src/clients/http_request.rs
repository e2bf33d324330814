//! HTTP request descriptor for the catalog API client.
//!
//! A request is built fresh for every logical call with
//! [`HttpRequest::builder`] (path relative to the REST base) or
//! [`HttpRequest::builder_for_url`] (absolute URL, used when following
//! pagination links).

use std::collections::HashMap;
use std::fmt;

use crate::clients::errors::InvalidHttpRequestError;
use crate::clients::retry::RetryPolicy;

/// HTTP methods supported by the catalog API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PATCH method for partial updates and upserts.
    Patch,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the upper-case method name as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Returns `true` for methods that must carry a body.
    #[must_use]
    pub const fn requires_body(&self) -> bool {
        matches!(self, Self::Post | Self::Patch | Self::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Patch => write!(f, "patch"),
            Self::Put => write!(f, "put"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Where a request is sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestTarget {
    /// A path relative to `{endpoint}/api/rest/v1/`.
    Path(String),
    /// A complete URL, sent as-is.
    Url(String),
}

/// A request to be sent to the catalog API.
///
/// # Example
///
/// ```rust
/// use catalog_api::clients::{HttpMethod, HttpRequest, RetryPolicy};
/// use serde_json::json;
///
/// let get_request = HttpRequest::builder(HttpMethod::Get, "products")
///     .query_param("limit", "100")
///     .build()
///     .unwrap();
///
/// let patch_request = HttpRequest::builder(HttpMethod::Patch, "products/tshirt-red")
///     .body(json!({"enabled": true}))
///     .retry_policy(RetryPolicy::new(3, 500))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// Where the request goes.
    pub target: RequestTarget,
    /// The JSON request body, if any.
    pub body: Option<serde_json::Value>,
    /// Query parameters to append to the URL.
    pub query: Option<HashMap<String, String>>,
    /// Additional headers to include in the request.
    pub extra_headers: Option<HashMap<String, String>>,
    /// Retry policy replacing the client default for this request.
    pub retry_policy: Option<RetryPolicy>,
}

impl HttpRequest {
    /// Creates a builder for a request to a path under the REST base.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, RequestTarget::Path(path.into()))
    }

    /// Creates a builder for a request to an absolute URL.
    #[must_use]
    pub fn builder_for_url(method: HttpMethod, url: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, RequestTarget::Url(url.into()))
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - the path is empty after stripping leading slashes
    /// - the URL has no `http://` or `https://` scheme
    /// - `http_method` is `Post`, `Patch` or `Put` but `body` is `None`
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        match &self.target {
            RequestTarget::Path(path) if path.trim_start_matches('/').is_empty() => {
                return Err(InvalidHttpRequestError::EmptyPath);
            }
            RequestTarget::Url(url)
                if !(url.starts_with("http://") || url.starts_with("https://")) =>
            {
                return Err(InvalidHttpRequestError::InvalidUrl { url: url.clone() });
            }
            _ => {}
        }

        if self.http_method.requires_body() && self.body.is_none() {
            return Err(InvalidHttpRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    target: RequestTarget,
    body: Option<serde_json::Value>,
    query: Option<HashMap<String, String>>,
    extra_headers: Option<HashMap<String, String>>,
    retry_policy: Option<RetryPolicy>,
}

impl HttpRequestBuilder {
    const fn new(method: HttpMethod, target: RequestTarget) -> Self {
        Self {
            http_method: method,
            target,
            body: None,
            query: None,
            extra_headers: None,
            retry_policy: None,
        }
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets all query parameters at once.
    #[must_use]
    pub fn query(mut self, query: HashMap<String, String>) -> Self {
        self.query = Some(query);
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Sets all extra headers at once.
    #[must_use]
    pub fn extra_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.extra_headers = Some(headers);
        self
    }

    /// Adds a single extra header.
    ///
    /// `Authorization` and `Content-Type` are owned by the client and are
    /// ignored if set here.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Overrides the client's retry policy for this request.
    #[must_use]
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            target: self.target,
            body: self.body,
            query: self.query,
            extra_headers: self.extra_headers,
            retry_policy: self.retry_policy,
        };
        request.verify()?;
        Ok(request)
    }
}
