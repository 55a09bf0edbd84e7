//! Configuration layer for the `webhook-dispatch` binary.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`], [`SendArgs`])
//! - TOML request definition parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The URL has no default and must come from `--url` or `request.url`.
//!
//! Headers are merged: TOML headers first, then `--header` flags, which
//! replace a TOML header of the same name (case-insensitive).
//!
//! # CLI-Only vs TOML-Only Options
//!
//! Some options are TOML-only (not available via CLI):
//! - `request.body`, `request.params`
//! - `retry.max_delay_ms`, `retry.multiplier`
//! - `retry.retryable_status_codes`, `retry.retryable_error_codes`
//! - `[[extract]]` mappings

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod toml_tests;
#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command, SendArgs};
pub use error::{ConfigError, field};
pub use toml::{RequestSection, RetrySection, TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, expand_tilde, write_default_config};
