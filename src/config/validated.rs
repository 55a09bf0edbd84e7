//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use http::header::HeaderName;
use serde_json::Value;

use crate::dispatch::{DispatchConfig, DispatchMethod, NetworkErrorCode, RetryPolicy};
use crate::extract::{FieldMapping, validate_mappings};
use crate::guard::redact_url;

use super::cli::SendArgs;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration for one `send` invocation.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args, an optional
/// TOML config and a context value. The function validates all inputs and
/// returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// The templated request
    pub dispatch: DispatchConfig,

    /// Per-attempt timeout
    pub timeout: Duration,

    /// Retry policy for failed attempts
    pub retry_policy: RetryPolicy,

    /// Response field mappings
    pub extract: Vec<FieldMapping>,

    /// Template context
    pub context: Value,

    /// Dry-run mode (build the request without sending it)
    pub dry_run: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let url = url::Url::parse(&self.dispatch.url)
            .map_or_else(|_| "<template>".to_string(), |u| redact_url(&u));

        write!(
            f,
            "Config {{ url: {}, method: {}, timeout: {}ms, retry: {}x/{}ms, extract: {}, dry_run: {} }}",
            url,
            self.dispatch.method,
            self.timeout.as_millis(),
            self.retry_policy.max_retries,
            self.retry_policy.initial_delay.as_millis(),
            self.extract.len(),
            self.dry_run,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments, an optional
    /// TOML config and the template context.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL is missing
    /// - The method is not one of GET, POST, PUT, PATCH, DELETE
    /// - A header is malformed or has an illegal name
    /// - The timeout is zero
    /// - The retry settings are inconsistent or name an unknown error code
    /// - An extract mapping is malformed
    pub fn from_raw(
        args: &SendArgs,
        toml: Option<&TomlConfig>,
        context: Value,
    ) -> Result<Self, ConfigError> {
        let request = toml.map(|t| &t.request);

        let url = Self::resolve_url(args, toml)?;
        let method = Self::resolve_method(args, toml)?;
        let headers = Self::resolve_headers(args, toml)?;
        let timeout = Self::resolve_timeout(args, toml)?;
        let retry_policy = Self::build_retry_policy(args, toml)?;

        let extract = toml.map(|t| t.extract.clone()).unwrap_or_default();
        validate_mappings(&extract)?;

        let dispatch = DispatchConfig {
            url,
            method,
            headers,
            body: request.and_then(|r| r.body.clone()),
            params: request.and_then(|r| r.params.clone()),
        };

        Ok(Self {
            dispatch,
            timeout,
            retry_policy,
            extract,
            context,
            dry_run: args.dry_run,
        })
    }

    /// Loads the config file and context file named in `args`, then merges.
    ///
    /// A missing `--context` yields an empty object context.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config or context file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(args: &SendArgs) -> Result<Self, ConfigError> {
        let toml = match args.config {
            Some(ref path) => Some(TomlConfig::load(&expand_tilde(path))?),
            None => None,
        };

        let context = match args.context {
            Some(ref path) => load_context(&expand_tilde(path))?,
            None => Value::Object(serde_json::Map::new()),
        };

        Self::from_raw(args, toml.as_ref(), context)
    }

    fn resolve_url(args: &SendArgs, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        // CLI takes precedence
        args.url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.request.url.as_deref()))
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                ConfigError::missing(field::URL, "Use --url or set request.url in config file")
            })
    }

    fn resolve_method(
        args: &SendArgs,
        toml: Option<&TomlConfig>,
    ) -> Result<DispatchMethod, ConfigError> {
        // Priority: CLI explicit > TOML > default
        args.method
            .as_deref()
            .or_else(|| toml.and_then(|t| t.request.method.as_deref()))
            .map_or(Ok(DispatchMethod::default()), |m| {
                m.parse::<DispatchMethod>()
                    .map_err(|_| ConfigError::InvalidMethod(m.to_string()))
            })
    }

    fn resolve_headers(
        args: &SendArgs,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<BTreeMap<String, String>>, ConfigError> {
        let mut headers = BTreeMap::new();

        // Add TOML headers first (CLI can override)
        if let Some(toml) = toml {
            for (name, value) in &toml.request.headers {
                check_header_name(name)?;
                insert_header(&mut headers, name, value);
            }
        }

        // Add CLI headers (override TOML)
        for header_str in &args.headers {
            let (name, value) = parse_header_string(header_str)?;
            check_header_name(&name)?;
            insert_header(&mut headers, &name, &value);
        }

        Ok((!headers.is_empty()).then_some(headers))
    }

    fn resolve_timeout(args: &SendArgs, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        let millis = args
            .timeout_ms
            .or_else(|| toml.and_then(|t| t.request.timeout_ms))
            .unwrap_or(defaults::TIMEOUT_MS);

        if millis == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout_ms",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_millis(millis))
    }

    fn build_retry_policy(
        args: &SendArgs,
        toml: Option<&TomlConfig>,
    ) -> Result<RetryPolicy, ConfigError> {
        let retry = toml.map(|t| &t.retry);

        // Priority: CLI explicit > TOML > default
        let max_retries = args
            .retry_max
            .or_else(|| retry.and_then(|r| r.max_retries))
            .unwrap_or(defaults::RETRY_MAX_RETRIES);

        let initial_delay_ms = args
            .retry_delay_ms
            .or_else(|| retry.and_then(|r| r.initial_delay_ms))
            .unwrap_or(defaults::RETRY_INITIAL_DELAY_MS);

        let max_delay_ms = retry
            .and_then(|r| r.max_delay_ms)
            .unwrap_or_else(|| defaults::RETRY_MAX_DELAY_MS.max(initial_delay_ms));

        let multiplier = retry
            .and_then(|r| r.multiplier)
            .unwrap_or(defaults::RETRY_MULTIPLIER);

        let mut policy = RetryPolicy::new()
            .with_max_retries(max_retries)
            .with_initial_delay(Duration::from_millis(initial_delay_ms))
            .with_max_delay(Duration::from_millis(max_delay_ms));
        policy.multiplier = multiplier;

        if let Some(codes) = retry.and_then(|r| r.retryable_status_codes.as_ref()) {
            policy = policy.with_retryable_status_codes(codes.iter().copied());
        }

        if let Some(codes) = retry.and_then(|r| r.retryable_error_codes.as_ref()) {
            let parsed = codes
                .iter()
                .map(|c| c.parse::<NetworkErrorCode>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(ConfigError::InvalidErrorCode)?;
            policy = policy.with_retryable_error_codes(parsed);
        }

        policy
            .validate()
            .map_err(|e| ConfigError::InvalidRetry(e.to_string()))?;

        Ok(policy)
    }
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~`, or when no home directory is known, are
/// returned unchanged.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest))
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let path = expand_tilde(path);
    let template = super::toml::default_config_template();
    std::fs::write(&path, template).map_err(|e| ConfigError::FileWrite { path, source: e })
}

fn load_context(path: &Path) -> Result<Value, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ContextRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| ConfigError::ContextParse {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

/// Splits `Key=Value` or `Key: Value` at whichever separator comes first,
/// so values may themselves contain `=` or `:`.
fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    let invalid = || ConfigError::InvalidHeader {
        value: s.to_string(),
    };

    let index = s.find(['=', ':']).ok_or_else(invalid)?;
    let (name, value) = (s[..index].trim(), s[index + 1..].trim());
    if name.is_empty() {
        return Err(invalid());
    }

    Ok((name.to_string(), value.to_string()))
}

fn check_header_name(name: &str) -> Result<(), ConfigError> {
    name.trim()
        .parse::<HeaderName>()
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

/// Inserts a header, replacing any existing entry with the same name
/// regardless of case.
fn insert_header(headers: &mut BTreeMap<String, String>, name: &str, value: &str) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
    headers.insert(name.to_string(), value.to_string());
}
