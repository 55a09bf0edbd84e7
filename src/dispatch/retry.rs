//! Retry policy configuration for dispatch operations.

use std::collections::BTreeSet;
use std::time::Duration;

use super::{AttemptOutcome, DispatchStatus, NetworkErrorCode, PolicyError};
use crate::time::as_millis_u64;

/// Configuration for exponential backoff retry behavior.
///
/// Controls how many times to retry a failed attempt, how long to wait
/// between attempts, and which failures count as transient. Delays grow
/// by `multiplier`, are capped at `max_delay`, then jittered by ±25%.
///
/// # Defaults
///
/// - `max_retries`: 3
/// - `initial_delay`: 1 second
/// - `max_delay`: 10 seconds
/// - `multiplier`: 2.0
/// - `retryable_status_codes`: 408, 429, 500, 502, 503, 504
/// - `retryable_error_codes`: connection-reset, timeout, aborted,
///   host-not-found, dns-retry
///
/// # Example
///
/// ```
/// use webhook_dispatch::dispatch::RetryPolicy;
/// use std::time::Duration;
///
/// // Create with defaults
/// let policy = RetryPolicy::default();
///
/// // Or customize via builder
/// let custom = RetryPolicy::new()
///     .with_max_retries(5)
///     .with_initial_delay(Duration::from_millis(200))
///     .with_max_delay(Duration::from_secs(5))
///     .with_multiplier(1.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts allowed after the first. Zero disables retrying.
    pub max_retries: u32,

    /// Delay before the first retry.
    ///
    /// Subsequent delays are computed by multiplying by `multiplier`.
    pub initial_delay: Duration,

    /// Cap applied to the computed delay before jitter.
    pub max_delay: Duration,

    /// Multiplier applied to the delay after each retry.
    pub multiplier: f64,

    /// HTTP statuses considered transient.
    pub retryable_status_codes: BTreeSet<u16>,

    /// Transport failures considered transient.
    pub retryable_error_codes: BTreeSet<NetworkErrorCode>,
}

impl RetryPolicy {
    /// Default number of retries.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Default initial delay (1 second).
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);

    /// Default maximum delay (10 seconds).
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);

    /// Default multiplier (2.0).
    pub const DEFAULT_MULTIPLIER: f64 = 2.0;

    /// Default transient HTTP statuses.
    pub const DEFAULT_RETRYABLE_STATUS_CODES: [u16; 6] = [408, 429, 500, 502, 503, 504];

    /// Default transient transport failures.
    pub const DEFAULT_RETRYABLE_ERROR_CODES: [NetworkErrorCode; 5] = [
        NetworkErrorCode::ConnectionReset,
        NetworkErrorCode::Timeout,
        NetworkErrorCode::Aborted,
        NetworkErrorCode::HostNotFound,
        NetworkErrorCode::DnsRetry,
    ];

    /// Jitter applied to each delay, as a fraction either side.
    pub const JITTER_FRACTION: f64 = 0.25;

    /// Creates a new retry policy with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            initial_delay: Self::DEFAULT_INITIAL_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            multiplier: Self::DEFAULT_MULTIPLIER,
            retryable_status_codes: Self::DEFAULT_RETRYABLE_STATUS_CODES.into(),
            retryable_error_codes: Self::DEFAULT_RETRYABLE_ERROR_CODES.into(),
        }
    }

    /// A policy that makes exactly one attempt.
    #[must_use]
    pub fn no_retry() -> Self {
        Self::new().with_max_retries(0)
    }

    /// Sets the number of retries after the first attempt.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the initial delay between retries.
    ///
    /// Zero delay is supported (useful for testing with [`InstantSleeper`])
    /// but not recommended for production as it creates a tight retry loop.
    ///
    /// [`InstantSleeper`]: crate::time::InstantSleeper
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the delay multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `multiplier` is not positive (must be > 0.0).
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        assert!(multiplier > 0.0, "multiplier must be positive");
        self.multiplier = multiplier;
        self
    }

    /// Replaces the retryable HTTP statuses.
    #[must_use]
    pub fn with_retryable_status_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.retryable_status_codes = codes.into_iter().collect();
        self
    }

    /// Replaces the retryable transport failure codes.
    #[must_use]
    pub fn with_retryable_error_codes(
        mut self,
        codes: impl IntoIterator<Item = NetworkErrorCode>,
    ) -> Self {
        self.retryable_error_codes = codes.into_iter().collect();
        self
    }

    /// Checks the policy for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] if the multiplier is not a positive finite
    /// number, or if `max_delay` is below `initial_delay`.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !(self.multiplier.is_finite() && self.multiplier > 0.0) {
            return Err(PolicyError::InvalidMultiplier(self.multiplier));
        }
        if self.max_delay < self.initial_delay {
            return Err(PolicyError::MaxDelayBelowInitial {
                initial_ms: as_millis_u64(self.initial_delay),
                max_ms: as_millis_u64(self.max_delay),
            });
        }
        Ok(())
    }

    /// Computes the un-jittered delay for a given retry number (0-indexed).
    ///
    /// # Arguments
    ///
    /// * `retry` - The retry number (0 = delay before first retry, 1 = delay before second retry, etc.)
    ///
    /// # Returns
    ///
    /// `initial_delay * multiplier^retry`, capped at `max_delay`.
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let delay_secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = delay_secs.min(self.max_delay.as_secs_f64()).max(0.0);
        Duration::try_from_secs_f64(capped).unwrap_or(self.max_delay)
    }

    /// Computes the jittered delay for a given retry number (0-indexed).
    ///
    /// `unit` is a sample in `[0, 1)`; it maps linearly onto
    /// `[-JITTER_FRACTION, +JITTER_FRACTION]` of the capped delay, so 0.5
    /// yields exactly [`delay_for_retry`](Self::delay_for_retry).
    #[must_use]
    pub fn jittered_delay(&self, retry: u32, unit: f64) -> Duration {
        let base = self.delay_for_retry(retry).as_secs_f64();
        let unit = if unit.is_finite() { unit.clamp(0.0, 1.0) } else { 0.5 };
        let factor = Self::JITTER_FRACTION.mul_add(2.0f64.mul_add(unit, -1.0), 1.0);
        Duration::try_from_secs_f64((base * factor).max(0.0)).unwrap_or(Duration::MAX)
    }

    /// Returns true if another attempt is allowed after `attempt_index` (0-based).
    #[must_use]
    pub const fn should_retry(&self, attempt_index: u32) -> bool {
        attempt_index < self.max_retries
    }

    /// Returns true if the failed outcome is transient under this policy.
    ///
    /// Timeouts are always transient; otherwise the HTTP status or the
    /// transport error code must be listed. Successes are never retryable.
    #[must_use]
    pub fn is_retryable(&self, outcome: &AttemptOutcome) -> bool {
        match outcome.status {
            DispatchStatus::Success => false,
            DispatchStatus::Timeout => true,
            DispatchStatus::Error => {
                outcome
                    .http_status
                    .is_some_and(|s| self.retryable_status_codes.contains(&s))
                    || outcome
                        .error_code
                        .is_some_and(|c| self.retryable_error_codes.contains(&c))
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Source of jitter samples for backoff delays.
pub trait Jitter: Send + Sync {
    /// Returns a sample in `[0, 1)`.
    fn sample(&self) -> f64;
}

/// Uniform random jitter backed by `fastrand`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl Jitter for RandomJitter {
    fn sample(&self) -> f64 {
        fastrand::f64()
    }
}

/// Constant jitter sample, for deterministic delays.
///
/// [`FixedJitter::NONE`] produces the un-jittered delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedJitter(pub f64);

impl FixedJitter {
    /// Sample that leaves delays unchanged.
    pub const NONE: Self = Self(0.5);
}

impl Jitter for FixedJitter {
    fn sample(&self) -> f64 {
        self.0
    }
}
