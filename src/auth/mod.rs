//! Authentication for the catalog API.
//!
//! The catalog API authenticates with short-lived bearer tokens obtained
//! through an OAuth2 password grant.
//!
//! # Overview
//!
//! - [`Credential`]: An access token and its expiry
//! - [`CredentialExchanger`]: Performs the password grant against the token endpoint
//! - [`CredentialSource`]: The seam between the cache and the exchanger
//! - [`TokenCache`]: Holds the current credential and refreshes it at most once at a time
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use catalog_api::auth::{CredentialExchanger, TokenCache};
//! use catalog_api::clients::ReqwestTransport;
//!
//! let transport = Arc::new(ReqwestTransport::new(config.timeout())?);
//! let exchanger = CredentialExchanger::new(&config, transport);
//! let cache = TokenCache::new(Arc::new(exchanger), config.refresh_if_within_secs());
//!
//! let credential = cache.get_token().await?;
//! println!("Token valid until {}", credential.expires_at());
//! ```

mod cache;
mod credential;
mod exchange;

pub use cache::TokenCache;
pub use credential::{Credential, TokenResponse};
pub use exchange::{CredentialExchanger, CredentialSource, TOKEN_PATH};
