//! Integration tests for the request executor's retry behavior.
//!
//! These tests drive [`HttpClient`] through a scripted in-memory transport
//! with Tokio's clock paused, so delays can be asserted exactly without
//! waiting for them.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use catalog_api::auth::{Credential, CredentialSource};
use catalog_api::clients::{
    ApiError, ErrorKind, HttpClient, HttpMethod, HttpRequest, HttpResponse, PreparedRequest,
    RetryPolicy, Transport, TransportError, MASK,
};
use catalog_api::{CatalogConfig, ClientId, ClientSecret, Endpoint, Password, Username};
use futures::future::BoxFuture;
use serde_json::json;
use tokio::time::Instant;

// ============================================================================
// Test doubles
// ============================================================================

/// Transport answering from a script and recording every request it sees.
#[derive(Debug, Default)]
struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    seen: Mutex<Vec<(Instant, PreparedRequest)>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Result<HttpResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn attempts(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    fn requests(&self) -> Vec<PreparedRequest> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|(_, request)| request.clone())
            .collect()
    }

    /// Gaps between consecutive attempts.
    fn gaps(&self) -> Vec<Duration> {
        let seen = self.seen.lock().unwrap();
        seen.windows(2).map(|pair| pair[1].0 - pair[0].0).collect()
    }
}

impl Transport for ScriptedTransport {
    fn send<'a>(
        &'a self,
        request: &'a PreparedRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            self.seen
                .lock()
                .unwrap()
                .push((Instant::now(), request.clone()));
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ok(json!({}))))
        })
    }
}

/// Credential source handing out `token-1`, `token-2`, ... and counting calls.
#[derive(Debug, Default)]
struct SequenceSource {
    calls: AtomicU32,
    fail: bool,
}

impl CredentialSource for SequenceSource {
    fn fetch_credential(&self) -> BoxFuture<'_, Result<Credential, ApiError>> {
        Box::pin(async move {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            // Keep the exchange in flight long enough for callers to pile up
            tokio::time::sleep(Duration::from_millis(50)).await;
            if self.fail {
                return Err(ApiError::credential_exchange(
                    "server returned status 401",
                    Some(401),
                    None,
                    None,
                ));
            }
            Ok(Credential::new(
                format!("token-{call}"),
                None,
                chrono::Utc::now(),
                chrono::Duration::seconds(3600),
            ))
        })
    }
}

fn ok(body: serde_json::Value) -> HttpResponse {
    HttpResponse::new(200, HashMap::new(), body)
}

fn status(code: u16) -> Result<HttpResponse, TransportError> {
    Err(TransportError::Status(HttpResponse::new(
        code,
        HashMap::new(),
        json!({"code": code, "message": "scripted failure"}),
    )))
}

fn rate_limited(retry_after: Option<&str>) -> Result<HttpResponse, TransportError> {
    let mut headers = HashMap::new();
    if let Some(value) = retry_after {
        headers.insert("retry-after".to_string(), vec![value.to_string()]);
    }
    Err(TransportError::Status(HttpResponse::new(
        429,
        headers,
        json!({"code": 429, "message": "Too many requests"}),
    )))
}

fn connection_reset() -> Result<HttpResponse, TransportError> {
    Err(TransportError::Connection {
        message: "connection reset by peer".to_string(),
    })
}

fn create_client(
    transport: Arc<ScriptedTransport>,
    source: Arc<SequenceSource>,
    retry: RetryPolicy,
) -> HttpClient {
    let config = CatalogConfig::builder()
        .endpoint(Endpoint::new("https://pim.example.com").unwrap())
        .client_id(ClientId::new("client").unwrap())
        .client_secret(ClientSecret::new("secret").unwrap())
        .username(Username::new("admin").unwrap())
        .password(Password::new("hunter2").unwrap())
        .retry(retry)
        .build()
        .unwrap();
    HttpClient::with_credential_source(&config, transport, source)
}

fn get_products() -> HttpRequest {
    HttpRequest::builder(HttpMethod::Get, "products")
        .build()
        .unwrap()
}

// ============================================================================
// Transient failures
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_server_error_makes_k_plus_one_attempts() {
    let transport = ScriptedTransport::new(vec![status(500), status(500), status(500), status(500)]);
    let client = create_client(
        transport.clone(),
        Arc::default(),
        RetryPolicy::new(3, 100),
    );

    let error = client.execute(get_products()).await.unwrap_err();

    assert_eq!(transport.attempts(), 4);
    assert_eq!(error.kind(), ErrorKind::Server);
    assert_eq!(error.status(), Some(500));
    assert_eq!(error.attempts(), 4);
    assert!(error.to_string().contains("after 4 attempts"));
    assert_eq!(
        transport.gaps(),
        vec![
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(400)
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_default_policy_does_not_retry_server_errors() {
    let transport = ScriptedTransport::new(vec![status(503)]);
    let client = create_client(transport.clone(), Arc::default(), RetryPolicy::default());

    let error = client.execute(get_products()).await.unwrap_err();

    assert_eq!(transport.attempts(), 1);
    assert_eq!(error.kind(), ErrorKind::Server);
    assert_eq!(error.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_connection_failure_is_retried_then_succeeds() {
    let transport = ScriptedTransport::new(vec![
        connection_reset(),
        connection_reset(),
        Ok(ok(json!({"identifier": "sku-1"}))),
    ]);
    let client = create_client(transport.clone(), Arc::default(), RetryPolicy::new(2, 50));

    let response = client.execute(get_products()).await.unwrap();

    assert_eq!(response.body["identifier"], "sku-1");
    assert_eq!(transport.attempts(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_unrecognized_failure_is_retried() {
    let transport = ScriptedTransport::new(vec![
        Err(TransportError::Other {
            message: "body stream ended early".to_string(),
        }),
        Ok(ok(json!({}))),
    ]);
    let client = create_client(transport.clone(), Arc::default(), RetryPolicy::new(1, 10));

    assert!(client.execute(get_products()).await.is_ok());
    assert_eq!(transport.attempts(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_jittered_delays_never_exceed_exponential_delay() {
    let transport = ScriptedTransport::new(vec![status(502), status(502), status(502), status(502)]);
    let client = create_client(
        transport.clone(),
        Arc::default(),
        RetryPolicy::new(3, 1000).with_jitter(true),
    );

    client.execute(get_products()).await.unwrap_err();

    let gaps = transport.gaps();
    assert_eq!(gaps.len(), 3);
    assert!(gaps[0] <= Duration::from_millis(1000));
    // Retry 2 draws from [1000, 2000], retry 3 from [2667, 4000]
    assert!(gaps[1] >= Duration::from_millis(1000) && gaps[1] <= Duration::from_millis(2000));
    assert!(gaps[2] >= Duration::from_millis(2666) && gaps[2] <= Duration::from_millis(4000));
}

// ============================================================================
// Client errors
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_bad_request_is_never_retried() {
    let transport = ScriptedTransport::new(vec![status(400)]);
    let client = create_client(transport.clone(), Arc::default(), RetryPolicy::new(5, 100));

    let error = client.execute(get_products()).await.unwrap_err();

    assert_eq!(transport.attempts(), 1);
    assert_eq!(error.kind(), ErrorKind::Client);
    assert_eq!(error.status(), Some(400));
    assert_eq!(error.attempts(), 1);
}

// ============================================================================
// Rate limiting
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_rate_limit_waits_for_retry_after() {
    let transport = ScriptedTransport::new(vec![rate_limited(Some("2")), Ok(ok(json!({})))]);
    let client = create_client(transport.clone(), Arc::default(), RetryPolicy::default());

    client.execute(get_products()).await.unwrap();

    assert_eq!(transport.attempts(), 2);
    assert!(transport.gaps()[0] >= Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_without_retry_after_uses_default_delay() {
    let transport = ScriptedTransport::new(vec![rate_limited(None), Ok(ok(json!({})))]);
    let client = create_client(transport.clone(), Arc::default(), RetryPolicy::default());

    client.execute(get_products()).await.unwrap();

    assert_eq!(transport.gaps(), vec![Duration::from_millis(5000)]);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_ignores_exponential_backoff() {
    let transport = ScriptedTransport::new(vec![
        rate_limited(Some("1")),
        rate_limited(Some("1")),
        rate_limited(Some("1")),
        Ok(ok(json!({}))),
    ]);
    let client = create_client(
        transport.clone(),
        Arc::default(),
        RetryPolicy::new(0, 10_000).with_jitter(true),
    );

    client.execute(get_products()).await.unwrap();

    assert_eq!(transport.gaps(), vec![Duration::from_secs(1); 3]);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_budget_is_used_in_full() {
    let mut script: Vec<_> = (0..4).map(|_| rate_limited(Some("3"))).collect();
    script.push(Ok(ok(json!({"done": true}))));
    let transport = ScriptedTransport::new(script);
    let client = create_client(
        transport.clone(),
        Arc::default(),
        RetryPolicy::default().with_max_429_retries(4),
    );
    let started = Instant::now();

    let response = client.execute(get_products()).await.unwrap();

    assert_eq!(response.body["done"], true);
    assert_eq!(transport.attempts(), 5);
    assert!(started.elapsed() >= Duration::from_secs(4 * 3));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_budget_exhaustion_raises_rate_limit_error() {
    let script: Vec<_> = (0..5).map(|_| rate_limited(None)).collect();
    let transport = ScriptedTransport::new(script);
    let client = create_client(
        transport.clone(),
        Arc::default(),
        RetryPolicy::default().with_max_429_retries(4),
    );

    let error = client.execute(get_products()).await.unwrap_err();

    assert_eq!(transport.attempts(), 5);
    assert_eq!(error.kind(), ErrorKind::RateLimit);
    assert_eq!(error.status(), Some(429));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_budget_is_independent_of_max_retries() {
    // One transient retry allowed; the 429s must not consume it
    let transport = ScriptedTransport::new(vec![
        rate_limited(Some("1")),
        rate_limited(Some("1")),
        status(500),
        Ok(ok(json!({}))),
    ]);
    let client = create_client(transport.clone(), Arc::default(), RetryPolicy::new(1, 100));

    client.execute(get_products()).await.unwrap();

    assert_eq!(transport.attempts(), 4);
    assert_eq!(
        transport.gaps(),
        vec![
            Duration::from_secs(1),
            Duration::from_secs(1),
            Duration::from_millis(100)
        ]
    );
}

// ============================================================================
// Policies, headers and tokens
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_request_policy_replaces_client_policy() {
    let transport = ScriptedTransport::new(vec![status(504), status(504), Ok(ok(json!({})))]);
    let client = create_client(transport.clone(), Arc::default(), RetryPolicy::none());

    let request = HttpRequest::builder(HttpMethod::Get, "products")
        .retry_policy(RetryPolicy::new(2, 10))
        .build()
        .unwrap();

    assert!(client.execute(request).await.is_ok());
    assert_eq!(transport.attempts(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_none_policy_does_not_retry_rate_limits() {
    let transport = ScriptedTransport::new(vec![rate_limited(Some("1"))]);
    let client = create_client(transport.clone(), Arc::default(), RetryPolicy::none());

    let error = client.execute(get_products()).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::RateLimit);
    assert_eq!(transport.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_every_attempt_carries_bearer_token_and_default_headers() {
    let transport = ScriptedTransport::new(vec![status(500), Ok(ok(json!({})))]);
    let source = Arc::new(SequenceSource::default());
    let client = create_client(transport.clone(), source.clone(), RetryPolicy::new(1, 10));

    let request = HttpRequest::builder(HttpMethod::Get, "/categories")
        .query_param("limit", "10")
        .header("Authorization", "Bearer caller-token")
        .header("X-Trace-Id", "trace-1")
        .build()
        .unwrap();
    client.execute(request).await.unwrap();

    for request in transport.requests() {
        assert_eq!(request.url, "https://pim.example.com/api/rest/v1/categories");
        assert_eq!(request.header("authorization"), Some("Bearer token-1"));
        assert_eq!(request.header("accept"), Some("application/json"));
        assert_eq!(request.header("x-trace-id"), Some("trace-1"));
        assert!(request
            .header("user-agent")
            .unwrap()
            .contains("Catalog API Rust Client"));
        assert_eq!(request.query, vec![("limit".to_string(), "10".to_string())]);
    }
    // The token is looked up before every attempt but exchanged only once
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_token_failure_is_raised_without_sending() {
    let transport = ScriptedTransport::new(vec![]);
    let source = Arc::new(SequenceSource {
        calls: AtomicU32::new(0),
        fail: true,
    });
    let client = create_client(transport.clone(), source, RetryPolicy::new(3, 100));

    let error = client.execute(get_products()).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::CredentialExchange);
    assert_eq!(error.status(), Some(401));
    assert_eq!(transport.attempts(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_requests_share_one_token_exchange() {
    let transport = ScriptedTransport::new(vec![]);
    let source = Arc::new(SequenceSource::default());
    let client = Arc::new(create_client(
        transport.clone(),
        source.clone(),
        RetryPolicy::default(),
    ));

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.execute(get_products()).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert_eq!(transport.attempts(), 10);
}

// ============================================================================
// Typed responses
// ============================================================================

#[derive(Debug, serde::Deserialize)]
struct Sku {
    identifier: String,
}

#[tokio::test(start_paused = true)]
async fn test_execute_json_decodes_body() {
    let transport = ScriptedTransport::new(vec![Ok(ok(json!({"identifier": "sku-1"})))]);
    let client = create_client(transport, Arc::default(), RetryPolicy::default());

    let sku: Sku = client.execute_json(get_products()).await.unwrap();

    assert_eq!(sku.identifier, "sku-1");
}

#[tokio::test(start_paused = true)]
async fn test_decode_failure_reports_status_attempts_and_request() {
    let transport = ScriptedTransport::new(vec![status(502), Ok(ok(json!({"identifier": 42})))]);
    let client = create_client(transport.clone(), Arc::default(), RetryPolicy::new(1, 10));

    let error = client.execute_json::<Sku>(get_products()).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Decode);
    assert_eq!(error.status(), Some(200));
    assert_eq!(error.attempts(), 2);
    assert!(!error.is_transient());
    let snapshot = error.request().unwrap();
    assert_eq!(snapshot.url, "https://pim.example.com/api/rest/v1/products");
    assert_eq!(snapshot.headers["Authorization"], MASK);
}

// ============================================================================
// Masking
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_error_serialization_masks_credentials() {
    let transport = ScriptedTransport::new(vec![status(422)]);
    let client = create_client(transport.clone(), Arc::default(), RetryPolicy::default());

    let request = HttpRequest::builder(HttpMethod::Post, "users")
        .body(json!({
            "username": "julia",
            "password": "s3cr3t-value",
            "profile": {"new_password": "another-s3cr3t"}
        }))
        .build()
        .unwrap();
    let error = client.execute(request).await.unwrap_err();

    let serialized = serde_json::to_string(&error).unwrap();
    assert!(!serialized.contains("token-1"));
    assert!(!serialized.contains("s3cr3t-value"));
    assert!(!serialized.contains("another-s3cr3t"));
    assert!(serialized.contains(MASK));
    assert!(serialized.contains("julia"));

    let snapshot = error.request().unwrap();
    assert_eq!(snapshot.headers["Authorization"], MASK);

    // The live request that went over the wire was not touched
    let sent = &transport.requests()[0];
    assert_eq!(sent.header("Authorization"), Some("Bearer token-1"));
    assert_eq!(sent.body.as_ref().unwrap()["password"], "s3cr3t-value");
}
