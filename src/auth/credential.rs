//! Access credential issued by the token endpoint.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Largest lifetime `chrono::Duration::seconds` accepts.
pub(crate) const MAX_LIFETIME_SECS: i64 = i64::MAX / 1000;

/// Response body of the token endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    /// The bearer token.
    pub access_token: String,
    /// Lifetime of the token in seconds.
    pub expires_in: i64,
    /// Token usable to obtain a new access token, if issued.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token type reported by the server (usually `bearer`).
    #[serde(default)]
    pub token_type: Option<String>,
}

/// An access token plus the metadata needed to decide when to refresh it.
///
/// Credentials are immutable: a refresh produces a new `Credential` rather
/// than modifying the current one. `Debug` output masks both tokens.
///
/// # Example
///
/// ```rust
/// use catalog_api::auth::Credential;
/// use chrono::{Duration, Utc};
///
/// let credential = Credential::new("access", None, Utc::now(), Duration::seconds(3600));
/// assert!(!credential.is_expired());
/// assert!(credential.expires_within(Duration::seconds(7200)));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    access_token: String,
    refresh_token: Option<String>,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Credential {
    /// Creates a credential valid for `expires_in` from `issued_at`.
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        issued_at: DateTime<Utc>,
        expires_in: Duration,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            issued_at,
            expires_at: issued_at
                .checked_add_signed(expires_in)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Creates a credential from a token endpoint response.
    #[must_use]
    pub fn from_token_response(response: TokenResponse, issued_at: DateTime<Utc>) -> Self {
        Self::new(
            response.access_token,
            response.refresh_token,
            issued_at,
            Duration::seconds(response.expires_in.clamp(0, MAX_LIFETIME_SECS)),
        )
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the refresh token, if one was issued.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Returns when the token was issued.
    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Returns when the token stops being accepted.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns `true` if the token expires within `window` of now.
    #[must_use]
    pub fn expires_within(&self, window: Duration) -> bool {
        self.expires_within_at(window, Utc::now())
    }

    /// Returns `true` if the token expires within `window` of `now`.
    #[must_use]
    pub fn expires_within_at(&self, window: Duration, now: DateTime<Utc>) -> bool {
        now.checked_add_signed(window)
            .map_or(true, |limit| self.expires_at <= limit)
    }

    /// Returns `true` if the token has already expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_within(Duration::zero())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"*****")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "*****"))
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
