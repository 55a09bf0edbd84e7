//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

use crate::dispatch::RetryPolicy;

/// Default per-attempt timeout in milliseconds.
pub const TIMEOUT_MS: u64 = 30_000;

/// Default number of retries after the first attempt.
pub const RETRY_MAX_RETRIES: u32 = RetryPolicy::DEFAULT_MAX_RETRIES;

/// Default initial retry delay in milliseconds.
pub const RETRY_INITIAL_DELAY_MS: u64 = 1_000;

/// Default maximum retry delay in milliseconds.
pub const RETRY_MAX_DELAY_MS: u64 = 10_000;

/// Default retry backoff multiplier.
pub const RETRY_MULTIPLIER: f64 = RetryPolicy::DEFAULT_MULTIPLIER;

/// Default file name written by `init`.
pub const CONFIG_FILE_NAME: &str = "webhook-dispatch.toml";

/// Default per-attempt timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_millis(TIMEOUT_MS)
}
