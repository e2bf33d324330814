//! Token cache with single-flight refresh.
//!
//! [`TokenCache`] hands out the current [`Credential`] and refreshes it when
//! it is missing or about to expire. However many callers ask at once, at
//! most one refresh is in flight: the first caller to find the credential
//! stale stores a shared refresh future in the cache, and every caller,
//! including later arrivals, awaits that same future.
//!
//! A failed refresh is delivered to every waiter. It leaves the previous
//! credential in place and clears the in-flight slot so the next call
//! starts a new refresh.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Duration;
use futures::future::{BoxFuture, FutureExt, Shared};

use crate::auth::credential::{Credential, MAX_LIFETIME_SECS};
use crate::auth::exchange::CredentialSource;
use crate::clients::ApiError;

type RefreshResult = Result<Arc<Credential>, ApiError>;
type RefreshFuture = Shared<BoxFuture<'static, RefreshResult>>;

#[derive(Debug, Default)]
struct CacheState {
    current: Option<Arc<Credential>>,
    in_flight: Option<InFlight>,
    generation: u64,
}

struct InFlight {
    generation: u64,
    future: RefreshFuture,
}

impl fmt::Debug for InFlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InFlight")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// Owns the current access credential for one client.
///
/// # Thread Safety
///
/// `TokenCache` is `Send + Sync`. The internal lock is never held across an
/// `.await`.
#[derive(Debug)]
pub struct TokenCache {
    source: Arc<dyn CredentialSource>,
    refresh_within: Duration,
    state: Arc<Mutex<CacheState>>,
}

// Verify TokenCache is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TokenCache>();
};

impl TokenCache {
    /// Creates an empty cache that refreshes credentials expiring within
    /// `refresh_if_within_secs` seconds.
    #[must_use]
    pub fn new(source: Arc<dyn CredentialSource>, refresh_if_within_secs: u64) -> Self {
        let secs = i64::try_from(refresh_if_within_secs)
            .unwrap_or(i64::MAX)
            .min(MAX_LIFETIME_SECS);
        Self {
            source,
            refresh_within: Duration::seconds(secs),
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }

    /// Returns a credential that does not expire within the lookahead window.
    ///
    /// # Errors
    ///
    /// Returns the refresh error if a refresh was needed and failed. Every
    /// caller waiting on that refresh receives the same error.
    pub async fn get_token(&self) -> Result<Arc<Credential>, ApiError> {
        let pending = {
            let mut state = self.lock();

            if let Some(credential) = &state.current {
                if !credential.expires_within(self.refresh_within) {
                    return Ok(Arc::clone(credential));
                }
            }

            match &state.in_flight {
                Some(in_flight) => in_flight.future.clone(),
                None => self.start_refresh(&mut state),
            }
        };

        pending.await
    }

    /// Returns the held credential without refreshing it.
    #[must_use]
    pub fn current(&self) -> Option<Arc<Credential>> {
        self.lock().current.clone()
    }

    /// Drops the held credential so the next call refreshes.
    ///
    /// A refresh already in flight is not cancelled.
    pub fn invalidate(&self) {
        self.lock().current = None;
    }

    fn start_refresh(&self, state: &mut CacheState) -> RefreshFuture {
        state.generation += 1;
        let generation = state.generation;

        let source = Arc::clone(&self.source);
        let shared_state = Arc::clone(&self.state);

        tracing::debug!(generation, "Refreshing access token");

        let future = async move {
            let outcome = source.fetch_credential().await.map(Arc::new);

            let mut state = shared_state.lock().unwrap_or_else(PoisonError::into_inner);
            if state
                .in_flight
                .as_ref()
                .is_some_and(|in_flight| in_flight.generation == generation)
            {
                state.in_flight = None;
            }
            match &outcome {
                Ok(credential) => {
                    tracing::debug!(
                        generation,
                        expires_at = %credential.expires_at(),
                        "Access token refreshed"
                    );
                    state.current = Some(Arc::clone(credential));
                }
                Err(error) => {
                    tracing::warn!(generation, error = %error, "Access token refresh failed");
                }
            }
            drop(state);

            outcome
        }
        .boxed()
        .shared();

        state.in_flight = Some(InFlight {
            generation,
            future: future.clone(),
        });
        future
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
