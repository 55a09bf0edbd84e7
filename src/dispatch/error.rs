//! Error types for dispatch operations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::guard::UrlRejected;

/// Classification of a transport-level failure.
///
/// Used to decide whether a failed attempt is worth retrying; see
/// [`RetryPolicy::retryable_error_codes`](super::RetryPolicy::retryable_error_codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkErrorCode {
    /// The peer reset the connection.
    ConnectionReset,
    /// The peer refused the connection.
    ConnectionRefused,
    /// The connection or read timed out at the socket level.
    Timeout,
    /// The connection was aborted locally.
    Aborted,
    /// The hostname does not exist.
    HostNotFound,
    /// Name resolution failed temporarily.
    DnsRetry,
    /// Anything else.
    Other,
}

impl NetworkErrorCode {
    /// All known codes.
    pub const ALL: [Self; 7] = [
        Self::ConnectionReset,
        Self::ConnectionRefused,
        Self::Timeout,
        Self::Aborted,
        Self::HostNotFound,
        Self::DnsRetry,
        Self::Other,
    ];

    /// Returns the kebab-case name used in configuration and results.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConnectionReset => "connection-reset",
            Self::ConnectionRefused => "connection-refused",
            Self::Timeout => "timeout",
            Self::Aborted => "aborted",
            Self::HostNotFound => "host-not-found",
            Self::DnsRetry => "dns-retry",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for NetworkErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkErrorCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == normalized)
            .ok_or_else(|| format!("unknown network error code '{s}'"))
    }
}

/// Error type for HTTP operations.
///
/// Describes what went wrong at the transport level. HTTP status codes are
/// never errors here: a 4xx/5xx response is a normal [`HttpResponse`](super::HttpResponse).
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused/reset,
    /// and other network-level errors.
    #[error("Connection error ({code}): {source}")]
    Connection {
        /// Classification used for retry decisions
        code: NetworkErrorCode,
        /// Underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Request timed out.
    ///
    /// The server did not respond within the configured timeout period.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be built (bad URL, header, or body).
    ///
    /// This indicates a configuration error rather than a transient failure.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl HttpError {
    /// Creates a connection error with the given classification.
    pub fn connection(
        code: NetworkErrorCode,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Connection {
            code,
            source: source.into(),
        }
    }

    /// Returns the network error code, if the error has one.
    #[must_use]
    pub const fn code(&self) -> Option<NetworkErrorCode> {
        match self {
            Self::Connection { code, .. } => Some(*code),
            Self::Timeout => Some(NetworkErrorCode::Timeout),
            Self::InvalidRequest(_) => None,
        }
    }
}

/// A retry policy is internally inconsistent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    /// The backoff multiplier is zero, negative, or not finite.
    #[error("multiplier must be a positive finite number, got {0}")]
    InvalidMultiplier(f64),

    /// The delay cap is below the initial delay.
    #[error("max_delay ({max_ms}ms) must be >= initial_delay ({initial_ms}ms)")]
    MaxDelayBelowInitial {
        /// Initial delay in milliseconds
        initial_ms: u64,
        /// Maximum delay in milliseconds
        max_ms: u64,
    },
}

/// Error returned by [`Dispatcher`](super::Dispatcher) for caller mistakes.
///
/// Ordinary network and HTTP failures are never reported through this type;
/// they are folded into [`DispatchResult`](super::DispatchResult).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The retry policy is malformed.
    #[error("Invalid retry policy: {0}")]
    InvalidPolicy(#[from] PolicyError),

    /// The per-attempt timeout is zero.
    #[error("Timeout must be greater than 0")]
    ZeroTimeout,

    /// A configured header name is not a legal HTTP token.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader {
        /// Header name as configured
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A header value is not legal once rendered against the context.
    ///
    /// Only returned by [`Dispatcher::prepare`](super::Dispatcher::prepare);
    /// a dispatch reports it as an unsuccessful result with no attempts.
    #[error("Header '{name}' has an illegal value after rendering: {reason}")]
    InvalidHeaderValue {
        /// Header name as configured
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The rendered URL was refused by the guard.
    ///
    /// Only returned by [`Dispatcher::prepare`](super::Dispatcher::prepare);
    /// a dispatch reports a rejection as an unsuccessful result instead.
    #[error("URL rejected: {0}")]
    UrlRejected(#[from] UrlRejected),
}
