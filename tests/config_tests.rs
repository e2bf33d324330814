//! Integration tests for client configuration.
//!
//! These tests verify that validated newtypes, the config builder and client
//! construction fit together without any network activity.

use catalog_api::clients::{HttpClient, REST_BASE_PATH, SDK_VERSION};
use catalog_api::{
    CatalogConfig, ClientId, ClientSecret, ConfigError, Endpoint, Password, RestClient,
    RetryPolicy, Username,
};

fn base_builder(endpoint: &str) -> catalog_api::CatalogConfigBuilder {
    CatalogConfig::builder()
        .endpoint(Endpoint::new(endpoint).unwrap())
        .client_id(ClientId::new("client").unwrap())
        .client_secret(ClientSecret::new("secret").unwrap())
        .username(Username::new("admin").unwrap())
        .password(Password::new("admin-pass").unwrap())
}

#[test]
fn test_full_workflow_create_newtypes_build_config_access_fields() {
    let config = base_builder("https://pim.example.com/")
        .timeout_ms(10_000)
        .retry(RetryPolicy::new(3, 250).with_jitter(true))
        .refresh_if_within_secs(60)
        .user_agent_prefix("Importer/2.1")
        .build()
        .unwrap();

    assert_eq!(config.endpoint().as_ref(), "https://pim.example.com");
    assert_eq!(config.client_id().as_ref(), "client");
    assert_eq!(config.username().as_ref(), "admin");
    assert_eq!(config.timeout_ms(), 10_000);
    assert_eq!(config.timeout(), std::time::Duration::from_secs(10));
    assert_eq!(config.retry().max_retries, 3);
    assert!(config.retry().jitter);
    assert_eq!(config.refresh_if_within_secs(), 60);
    assert_eq!(config.user_agent_prefix(), Some("Importer/2.1"));
}

#[test]
fn test_defaults_apply_when_optional_fields_are_unset() {
    let config = base_builder("https://pim.example.com").build().unwrap();

    assert_eq!(config.timeout_ms(), 5000);
    assert_eq!(config.retry(), &RetryPolicy::default());
    assert_eq!(config.retry().max_retries, 0);
    assert_eq!(config.retry().max_429_retries, 5);
    assert_eq!(config.refresh_if_within_secs(), 1800);
    assert_eq!(config.user_agent_prefix(), None);
}

#[test]
fn test_error_handling_invalid_inputs_produce_correct_errors() {
    assert_eq!(ClientId::new(""), Err(ConfigError::EmptyClientId));
    assert!(matches!(
        ClientSecret::new(""),
        Err(ConfigError::EmptyClientSecret)
    ));
    assert!(matches!(Username::new(""), Err(ConfigError::EmptyUsername)));
    assert!(matches!(Password::new(""), Err(ConfigError::EmptyPassword)));
    assert!(matches!(
        Endpoint::new("pim.example.com"),
        Err(ConfigError::InvalidEndpoint { .. })
    ));
    assert!(matches!(
        base_builder("https://pim.example.com").timeout_ms(0).build(),
        Err(ConfigError::InvalidTimeout)
    ));

    let missing = CatalogConfig::builder()
        .endpoint(Endpoint::new("https://pim.example.com").unwrap())
        .client_id(ClientId::new("client").unwrap())
        .client_secret(ClientSecret::new("secret").unwrap())
        .username(Username::new("admin").unwrap())
        .build();
    assert_eq!(
        missing.unwrap_err(),
        ConfigError::MissingRequiredField { field: "password" }
    );
}

#[test]
fn test_debug_output_hides_secrets() {
    let config = base_builder("https://pim.example.com").build().unwrap();
    let debug = format!("{config:?}");

    assert!(!debug.contains("admin-pass"));
    assert!(!debug.contains("\"secret\""));
    assert!(debug.contains("pim.example.com"));
}

#[test]
fn test_multi_tenant_scenario_multiple_independent_clients() {
    let config_a = base_builder("https://pim-a.example.com").build().unwrap();
    let config_b = base_builder("https://pim-b.example.com:8443")
        .retry(RetryPolicy::new(2, 100))
        .build()
        .unwrap();

    let client_a = HttpClient::new(&config_a).unwrap();
    let client_b = HttpClient::new(&config_b).unwrap();

    assert_eq!(
        client_a.base_url(),
        format!("https://pim-a.example.com{REST_BASE_PATH}")
    );
    assert_eq!(
        client_b.base_url(),
        format!("https://pim-b.example.com:8443{REST_BASE_PATH}")
    );
    assert_eq!(client_a.retry_policy().max_retries, 0);
    assert_eq!(client_b.retry_policy().max_retries, 2);

    // Each client owns its cache; nothing is fetched until the first request
    assert!(client_a.token_cache().current().is_none());
    assert!(client_b.token_cache().current().is_none());
}

#[test]
fn test_config_can_be_cloned_and_shared() {
    let config = base_builder("https://pim.example.com")
        .user_agent_prefix("Sync/1.0")
        .build()
        .unwrap();
    let cloned = config.clone();

    let client = RestClient::new(&cloned).unwrap();
    let user_agent = &client.http_client().default_headers()["User-Agent"];

    assert_eq!(
        user_agent,
        &format!("Sync/1.0 | Catalog API Rust Client v{SDK_VERSION}")
    );
    assert_eq!(config.endpoint(), cloned.endpoint());
}
