//! Password-grant token exchange.
//!
//! The [`CredentialExchanger`] turns the configured username/password and
//! client identifier/secret into a [`Credential`] with a single
//! `POST {endpoint}/api/oauth/v1/token` call:
//!
//! - `Authorization: Basic base64(client_id:client_secret)`
//! - body `{"grant_type": "password", "username": ..., "password": ...}`
//!
//! Every failure is reported as an [`ApiError`] of kind
//! [`ErrorKind::CredentialExchange`](crate::clients::ErrorKind::CredentialExchange)
//! with the Basic header and the password masked.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use futures::future::BoxFuture;
use serde::Serialize;

use crate::auth::credential::{Credential, TokenResponse};
use crate::clients::{ApiError, HttpMethod, PreparedRequest, Transport, TransportError};
use crate::config::{CatalogConfig, ClientId, ClientSecret, Password, Username};

/// Path of the token endpoint, relative to the server endpoint.
pub const TOKEN_PATH: &str = "/api/oauth/v1/token";

const PASSWORD_GRANT_TYPE: &str = "password";

/// Something that can produce a fresh [`Credential`].
///
/// The token cache depends on this trait rather than on the exchanger
/// directly.
pub trait CredentialSource: Send + Sync + fmt::Debug {
    /// Obtains a new credential.
    fn fetch_credential(&self) -> BoxFuture<'_, Result<Credential, ApiError>>;
}

/// Request body for the password grant.
#[derive(Debug, Serialize)]
struct PasswordGrantRequest<'a> {
    grant_type: &'a str,
    username: &'a str,
    password: &'a str,
}

/// Exchanges account credentials for an access token.
#[derive(Debug)]
pub struct CredentialExchanger {
    transport: Arc<dyn Transport>,
    token_url: String,
    client_id: ClientId,
    client_secret: ClientSecret,
    username: Username,
    password: Password,
}

impl CredentialExchanger {
    /// Creates an exchanger for the server and account in `config`.
    ///
    /// The request timeout is the one configured on `transport`.
    #[must_use]
    pub fn new(config: &CatalogConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            token_url: config.endpoint().join(TOKEN_PATH),
            client_id: config.client_id().clone(),
            client_secret: config.client_secret().clone(),
            username: config.username().clone(),
            password: config.password().clone(),
        }
    }

    /// Returns the token endpoint URL.
    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Performs the token exchange.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] of kind `CredentialExchange` if the server
    /// cannot be reached, rejects the credentials, or answers with a body
    /// that is not a token response.
    pub async fn exchange(&self) -> Result<Credential, ApiError> {
        let request = self.prepare()?;

        tracing::debug!(url = %self.token_url, "Requesting access token");

        let response = self
            .transport
            .send(&request)
            .await
            .map_err(|error| match error {
                TransportError::Status(response) => ApiError::credential_exchange(
                    response.error_message().map_or_else(
                        || format!("server returned status {}", response.code),
                        |detail| format!("server returned status {}: {detail}", response.code),
                    ),
                    Some(response.code),
                    Some(&request),
                    Some(response.body),
                ),
                other => ApiError::credential_exchange(other.to_string(), None, Some(&request), None),
            })?;

        let token: TokenResponse = serde_json::from_value(response.body).map_err(|e| {
            ApiError::credential_exchange(
                format!("failed to parse token response: {e}"),
                Some(response.code),
                Some(&request),
                None,
            )
        })?;

        Ok(Credential::from_token_response(token, Utc::now()))
    }

    fn prepare(&self) -> Result<PreparedRequest, ApiError> {
        let body = serde_json::to_value(PasswordGrantRequest {
            grant_type: PASSWORD_GRANT_TYPE,
            username: self.username.as_ref(),
            password: self.password.as_ref(),
        })
        .map_err(|e| ApiError::credential_exchange(e.to_string(), None, None, None))?;

        let basic = STANDARD.encode(format!(
            "{}:{}",
            self.client_id.as_ref(),
            self.client_secret.as_ref()
        ));

        let mut request = PreparedRequest::new(HttpMethod::Post, self.token_url.clone());
        request.set_header("Authorization", format!("Basic {basic}"));
        request.set_header("Content-Type", "application/json");
        request.set_header("Accept", "application/json");
        request.body = Some(body);
        Ok(request)
    }
}

impl CredentialSource for CredentialExchanger {
    fn fetch_credential(&self) -> BoxFuture<'_, Result<Credential, ApiError>> {
        Box::pin(self.exchange())
    }
}
