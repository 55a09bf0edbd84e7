//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::ConfigError;
use crate::extract::FieldMapping;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Request definition section
    #[serde(default)]
    pub request: RequestSection,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetrySection,

    /// Response field mappings
    #[serde(default)]
    pub extract: Vec<FieldMapping>,
}

/// Request definition section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestSection {
    /// URL template
    pub url: Option<String>,

    /// HTTP method (default: POST)
    pub method: Option<String>,

    /// Per-attempt timeout in milliseconds
    pub timeout_ms: Option<u64>,

    /// Header templates as key-value pairs
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Body: a string template, or a table whose string leaves are templates
    pub body: Option<Value>,

    /// Query parameters whose string leaves are templates
    pub params: Option<Map<String, Value>>,
}

/// Retry policy configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Retries after the first attempt
    pub max_retries: Option<u32>,

    /// Initial retry delay in milliseconds
    pub initial_delay_ms: Option<u64>,

    /// Maximum retry delay in milliseconds
    pub max_delay_ms: Option<u64>,

    /// Backoff multiplier
    pub multiplier: Option<f64>,

    /// HTTP statuses treated as transient
    pub retryable_status_codes: Option<Vec<u16>>,

    /// Network error codes treated as transient
    pub retryable_error_codes: Option<Vec<String>>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# webhook-dispatch configuration
#
# String values in [request] are Handlebars templates rendered against the
# JSON context passed with --context, e.g. "{{contact.email}}".

[request]
# URL template (required; only public http/https destinations are allowed)
url = "https://api.example.com/contacts/{{contact.id}}"

# HTTP method: GET, POST, PUT, PATCH, DELETE (default: POST)
# method = "POST"

# Per-attempt timeout in milliseconds (default: 30000)
# timeout_ms = 30000

# Body: either a string template (parsed as JSON after rendering when possible)
# body = '{"email": "{{contact.email}}"}'
# or a table whose string leaves are templates. For GET, a table body is sent
# as query parameters instead.
# [request.body]
# email = "{{contact.email}}"

# Header templates. Content-Type and User-Agent defaults can be overridden.
# [request.headers]
# Authorization = "Bearer {{secrets.token}}"

# Query parameter templates
# [request.params]
# source = "crm"

[retry]
# Retries after the first attempt; 0 disables retrying (default: 3)
# max_retries = 3

# Initial delay in milliseconds (default: 1000)
# initial_delay_ms = 1000

# Delay cap in milliseconds (default: 10000)
# max_delay_ms = 10000

# Backoff multiplier (default: 2.0)
# multiplier = 2.0

# HTTP statuses treated as transient (default shown)
# retryable_status_codes = [408, 429, 500, 502, 503, 504]

# Network failures treated as transient (default shown). Known codes:
# connection-reset, connection-refused, timeout, aborted, host-not-found,
# dns-retry, other
# retryable_error_codes = ["connection-reset", "timeout", "aborted", "host-not-found", "dns-retry"]

# Fields copied out of a successful JSON response
# [[extract]]
# output_name = "first_tag"
# path = "user.tags[0]"
"#
    .to_string()
}
