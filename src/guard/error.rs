//! Rejection reasons produced by the URL guard.

use std::net::{Ipv4Addr, Ipv6Addr};

use thiserror::Error;

/// Reason a URL was refused as a dispatch destination.
///
/// A rejection is terminal for the dispatch: no request is issued and
/// the result carries zero attempts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlRejected {
    /// The URL could not be parsed at all.
    #[error("Invalid URL: {0}")]
    Unparsable(String),

    /// Only `http` and `https` are accepted.
    #[error("Unsupported URL scheme '{0}': only http and https are allowed")]
    UnsupportedScheme(String),

    /// The URL carries a username or password.
    #[error("URL must not contain embedded credentials")]
    EmbeddedCredentials,

    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,

    /// The hostname is on the internal-host denylist.
    #[error("Hostname '{0}' is not allowed")]
    BlockedHostname(String),

    /// The host is an IPv4 literal inside a blocked range.
    #[error("IPv4 address {address} is not allowed ({range})")]
    BlockedIpv4 {
        /// The offending address
        address: Ipv4Addr,
        /// Human-readable name of the matched range
        range: &'static str,
    },

    /// The host is an IPv6 literal inside a blocked range.
    #[error("IPv6 address {address} is not allowed ({range})")]
    BlockedIpv6 {
        /// The offending address
        address: Ipv6Addr,
        /// Human-readable name of the matched range
        range: &'static str,
    },
}
