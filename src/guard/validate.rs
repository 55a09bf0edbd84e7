//! URL validation against the outbound SSRF policy.

use std::net::{Ipv4Addr, Ipv6Addr};

use serde::Serialize;
use url::{Host, Url};

use super::UrlRejected;

/// Hostnames that always refer to the local machine or a cloud metadata service.
const BLOCKED_HOSTNAMES: &[&str] = &[
    "localhost",
    "localhost.localdomain",
    "ip6-localhost",
    "ip6-loopback",
    "metadata",
    "metadata.google.internal",
    "metadata.goog",
    "instance-data",
    "instance-data.ec2.internal",
];

/// Cloud metadata endpoints, reported by name before the range checks.
const METADATA_IPV4: &[Ipv4Addr] = &[
    Ipv4Addr::new(169, 254, 169, 254),
    Ipv4Addr::new(169, 254, 170, 2),
    Ipv4Addr::new(100, 100, 100, 200),
];

const METADATA_IPV6: &[Ipv6Addr] = &[Ipv6Addr::new(0xfd00, 0x0ec2, 0, 0, 0, 0, 0, 0x0254)];

/// Blocked IPv4 ranges as (network, prefix length, label).
const BLOCKED_IPV4: &[(Ipv4Addr, u32, &str)] = &[
    (Ipv4Addr::new(0, 0, 0, 0), 8, "current network"),
    (Ipv4Addr::new(10, 0, 0, 0), 8, "private"),
    (Ipv4Addr::new(100, 64, 0, 0), 10, "carrier-grade NAT"),
    (Ipv4Addr::new(127, 0, 0, 0), 8, "loopback"),
    (Ipv4Addr::new(169, 254, 0, 0), 16, "link-local"),
    (Ipv4Addr::new(172, 16, 0, 0), 12, "private"),
    (Ipv4Addr::new(192, 0, 0, 0), 24, "IETF protocol assignments"),
    (Ipv4Addr::new(192, 0, 2, 0), 24, "documentation"),
    (Ipv4Addr::new(192, 88, 99, 0), 24, "6to4 relay"),
    (Ipv4Addr::new(192, 168, 0, 0), 16, "private"),
    (Ipv4Addr::new(198, 18, 0, 0), 15, "benchmarking"),
    (Ipv4Addr::new(198, 51, 100, 0), 24, "documentation"),
    (Ipv4Addr::new(203, 0, 113, 0), 24, "documentation"),
    (Ipv4Addr::new(224, 0, 0, 0), 4, "multicast"),
    (Ipv4Addr::new(240, 0, 0, 0), 4, "reserved"),
];

/// Validates a rendered URL against the outbound policy.
///
/// Returns the parsed URL when it may be dispatched to.
///
/// # Errors
///
/// Returns [`UrlRejected`] when the URL:
/// - cannot be parsed
/// - uses a scheme other than `http`/`https`
/// - embeds basic-auth credentials
/// - names a denylisted host or a blocked IP literal
///
/// # Example
///
/// ```
/// use webhook_dispatch::guard::{validate_url, UrlRejected};
///
/// assert!(validate_url("https://api.example.com/hook").is_ok());
/// assert!(matches!(
///     validate_url("http://127.0.0.1:8080/"),
///     Err(UrlRejected::BlockedIpv4 { .. })
/// ));
/// ```
pub fn validate_url(raw: &str) -> Result<Url, UrlRejected> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlRejected::Unparsable(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlRejected::UnsupportedScheme(other.to_string())),
    }

    if !url.username().is_empty() || url.password().is_some() {
        return Err(UrlRejected::EmbeddedCredentials);
    }

    match url.host() {
        None => Err(UrlRejected::MissingHost),
        Some(Host::Domain(domain)) => check_hostname(domain),
        Some(Host::Ipv4(address)) => check_ipv4(address),
        Some(Host::Ipv6(address)) => check_ipv6(address),
    }?;

    Ok(url)
}

/// Outcome of a pre-flight URL check, shaped for callers that persist
/// dispatch configuration and want a plain verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlCheck {
    /// Whether the URL may be dispatched to
    pub valid: bool,
    /// Why it was rejected, when it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Runs [`validate_url`] and folds the outcome into a [`UrlCheck`].
#[must_use]
pub fn check_url(raw: &str) -> UrlCheck {
    match validate_url(raw) {
        Ok(_) => UrlCheck {
            valid: true,
            reason: None,
        },
        Err(e) => UrlCheck {
            valid: false,
            reason: Some(e.to_string()),
        },
    }
}

/// Renders a URL for logs: credentials, query and fragment are dropped.
#[must_use]
pub fn redact_url(url: &Url) -> String {
    let mut redacted = url.clone();
    let _ = redacted.set_username("");
    let _ = redacted.set_password(None);
    redacted.set_query(None);
    redacted.set_fragment(None);
    redacted.to_string()
}

fn check_hostname(domain: &str) -> Result<(), UrlRejected> {
    let normalized = domain.trim_end_matches('.').to_ascii_lowercase();

    let blocked = BLOCKED_HOSTNAMES.contains(&normalized.as_str())
        || normalized.ends_with(".localhost")
        || normalized.is_empty();

    if blocked {
        return Err(UrlRejected::BlockedHostname(domain.to_string()));
    }

    // Non-special schemes leave IP-looking hosts as domains; reparse to be sure.
    if let Ok(address) = normalized.parse::<Ipv4Addr>() {
        return check_ipv4(address);
    }

    Ok(())
}

fn check_ipv4(address: Ipv4Addr) -> Result<(), UrlRejected> {
    if METADATA_IPV4.contains(&address) {
        return Err(UrlRejected::BlockedIpv4 {
            address,
            range: "cloud metadata endpoint",
        });
    }

    let bits = u32::from(address);
    for &(network, prefix, range) in BLOCKED_IPV4 {
        let mask = u32::MAX << (32 - prefix);
        if bits & mask == u32::from(network) & mask {
            return Err(UrlRejected::BlockedIpv4 { address, range });
        }
    }

    Ok(())
}

fn check_ipv6(address: Ipv6Addr) -> Result<(), UrlRejected> {
    let first = address.segments()[0];
    let range = if METADATA_IPV6.contains(&address) {
        Some("cloud metadata endpoint")
    } else if address.is_loopback() {
        Some("loopback")
    } else if address.is_unspecified() {
        Some("unspecified")
    } else if let Some(embedded) = embedded_ipv4(address) {
        return check_ipv4(embedded);
    } else if first & 0xfe00 == 0xfc00 {
        Some("unique local")
    } else if first & 0xffc0 == 0xfe80 {
        Some("link-local")
    } else if first & 0xffc0 == 0xfec0 {
        Some("site-local")
    } else if address.is_multicast() {
        Some("multicast")
    } else {
        None
    };

    range.map_or(Ok(()), |range| {
        Err(UrlRejected::BlockedIpv6 { address, range })
    })
}

/// IPv4 address carried inside an IPv6 literal: mapped (`::ffff:0:0/96`),
/// compatible (`::/96`), NAT64 (`64:ff9b::/96`) or 6to4 (`2002::/16`).
fn embedded_ipv4(address: Ipv6Addr) -> Option<Ipv4Addr> {
    let [s0, s1, s2, s3, s4, s5, s6, s7] = address.segments();
    let from_pair = |hi: u16, lo: u16| Ipv4Addr::from((u32::from(hi) << 16) | u32::from(lo));

    match (s0, s1, s2, s3, s4, s5) {
        (0, 0, 0, 0, 0, 0 | 0xffff) | (0x0064, 0xff9b, 0, 0, 0, 0) => Some(from_pair(s6, s7)),
        (0x2002, ..) => Some(from_pair(s1, s2)),
        _ => None,
    }
}
