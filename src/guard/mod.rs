//! Outbound URL guard (SSRF protection).
//!
//! Every dispatch URL is checked once, after template rendering and before
//! any request is issued. The guard is literal-only: hostnames are matched
//! against a denylist and IP literals against blocked ranges, but no DNS
//! resolution is performed, so a public name that resolves to an internal
//! address is not caught here.
//!
//! This module provides:
//! - Standalone validation ([`validate_url`]) returning the parsed [`url::Url`]
//! - A serialisable pre-flight verdict ([`check_url`], [`UrlCheck`])
//! - Log-safe URL rendering ([`redact_url`])

mod error;
mod validate;

#[cfg(test)]
mod validate_tests;

pub use error::UrlRejected;
pub use validate::{UrlCheck, check_url, redact_url, validate_url};
