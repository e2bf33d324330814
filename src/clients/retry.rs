//! Retry policy, failure classification and backoff calculation.
//!
//! The request executor consults this module after every failed attempt:
//! [`FailureKind::classify`] decides whether the failure is worth retrying
//! and [`retry_delay`] decides how long to wait before the next attempt.
//!
//! Two independent budgets exist. Transient failures (connection errors,
//! 5xx responses, unrecognized errors) consume `max_retries` and wait an
//! exponentially growing delay. `429 Too Many Requests` responses consume
//! `max_429_retries` and wait for the server's `Retry-After` value or
//! [`DEFAULT_RATE_LIMIT_DELAY_MS`].

use std::time::Duration;

use rand::Rng;

use crate::clients::transport::TransportError;

/// Delay used for a 429 response without a usable `Retry-After` header.
pub const DEFAULT_RATE_LIMIT_DELAY_MS: u64 = 5000;

/// Default number of retries allowed for 429 responses.
pub const DEFAULT_MAX_429_RETRIES: u32 = 5;

/// Status codes for which a retry is considered likely to succeed.
pub const RETRYABLE_STATUS_CODES: [u16; 5] = [500, 501, 502, 503, 504];

/// How a request should be retried.
///
/// A policy set on a request fully replaces the client-level policy; the two
/// are never merged.
///
/// # Example
///
/// ```rust
/// use catalog_api::clients::RetryPolicy;
///
/// let policy = RetryPolicy::new(3, 200).with_jitter(true);
/// assert_eq!(policy.max_retries, 3);
/// assert_eq!(policy.max_429_retries, 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed for transient failures.
    pub max_retries: u32,
    /// Base delay of the exponential backoff, in milliseconds.
    pub base_delay_ms: u64,
    /// Whether to randomize the exponential delay.
    pub jitter: bool,
    /// Retries allowed for 429 responses, independent of `max_retries`.
    pub max_429_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 0,
            jitter: false,
            max_429_retries: DEFAULT_MAX_429_RETRIES,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given transient-failure budget and base delay.
    #[must_use]
    pub const fn new(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            jitter: false,
            max_429_retries: DEFAULT_MAX_429_RETRIES,
        }
    }

    /// A policy that never retries, not even on 429.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 0,
            jitter: false,
            max_429_retries: 0,
        }
    }

    /// Enables or disables jitter.
    #[must_use]
    pub const fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Sets the 429 retry budget.
    #[must_use]
    pub const fn with_max_429_retries(mut self, retries: u32) -> Self {
        self.max_429_retries = retries;
        self
    }
}

/// Classification of a failed attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Connection failure, retryable status, or unrecognized error.
    Transient,
    /// `429 Too Many Requests`, with the parsed `Retry-After` seconds.
    RateLimited {
        /// Seconds the server asked us to wait, if it said.
        retry_after: Option<u64>,
    },
    /// Any other response status. Never retried.
    Terminal,
}

impl FailureKind {
    /// Classifies a transport failure by its tag.
    #[must_use]
    pub fn classify(error: &TransportError) -> Self {
        match error {
            TransportError::Other { .. } | TransportError::Connection { .. } => Self::Transient,
            TransportError::Status(response) if response.code == 429 => Self::RateLimited {
                retry_after: response.retry_after,
            },
            TransportError::Status(response) if RETRYABLE_STATUS_CODES.contains(&response.code) => {
                Self::Transient
            }
            TransportError::Status(_) => Self::Terminal,
        }
    }

    /// Returns `true` unless the failure is terminal.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Terminal)
    }
}

/// Computes how long to wait before retry number `attempt` (1-indexed).
///
/// Returns `None` for terminal failures.
#[must_use]
pub fn retry_delay(policy: &RetryPolicy, failure: FailureKind, attempt: u32) -> Option<Duration> {
    retry_delay_with_rng(policy, failure, attempt, &mut rand::thread_rng())
}

/// Same as [`retry_delay`] but draws jitter from the given random source.
#[must_use]
pub fn retry_delay_with_rng<R: Rng + ?Sized>(
    policy: &RetryPolicy,
    failure: FailureKind,
    attempt: u32,
    rng: &mut R,
) -> Option<Duration> {
    match failure {
        FailureKind::Terminal => None,
        FailureKind::RateLimited { retry_after } => Some(rate_limit_delay(retry_after)),
        FailureKind::Transient => {
            let delay = exponential_delay_ms(policy.base_delay_ms, attempt);
            let delay = if policy.jitter {
                jittered_delay_ms(delay, attempt, rng)
            } else {
                delay
            };
            Some(Duration::from_millis(delay))
        }
    }
}

/// Delay for a 429 response: `Retry-After` seconds, or the default.
#[must_use]
pub fn rate_limit_delay(retry_after: Option<u64>) -> Duration {
    retry_after.map_or(
        Duration::from_millis(DEFAULT_RATE_LIMIT_DELAY_MS),
        Duration::from_secs,
    )
}

/// `base * 2^(attempt - 1)`, saturating at `u64::MAX`.
#[must_use]
pub fn exponential_delay_ms(base_delay_ms: u64, attempt: u32) -> u64 {
    let exponent = attempt.saturating_sub(1);
    let factor = 2_u64.checked_pow(exponent).unwrap_or(u64::MAX);
    base_delay_ms.saturating_mul(factor)
}

/// Full jitter with a spread that narrows as attempts accumulate.
///
/// The result is drawn uniformly from `[delay - delay / attempt, delay]`:
/// the whole `[0, delay]` range on the first retry, then a window that
/// shrinks toward `delay` itself.
fn jittered_delay_ms<R: Rng + ?Sized>(delay: u64, attempt: u32, rng: &mut R) -> u64 {
    if delay == 0 {
        return 0;
    }
    let spread = delay / u64::from(attempt.max(1));
    let low = delay - spread;
    rng.gen_range(low..=delay)
}
