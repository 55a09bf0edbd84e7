//! Process-level helpers for the binary: exit codes, logging, hints.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use webhook_dispatch::config::{ConfigError, field};

/// Exit codes returned by the binary.
pub mod exit_code {
    use std::process::ExitCode;

    /// 0: the command did what was asked.
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// 1: bad arguments, unreadable files, or invalid settings.
    ///
    /// Also used by `check-url` for a rejected URL.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Dispatch failed (exit code 2) - the final attempt was not a 2xx.
    ///
    /// `ExitCode::from` is not `const`, hence a function.
    pub fn dispatch_failed() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Follows a configuration error with a next step, where one helps.
pub fn print_config_hint(error: &ConfigError) {
    match error {
        ConfigError::MissingRequired { field: f, .. } if *f == field::URL => {
            eprintln!("\nRun 'webhook-dispatch init' to generate a configuration template.");
        }
        ConfigError::FileRead { .. } => {
            eprintln!("\nRun 'webhook-dispatch init' to generate a configuration template.");
        }
        ConfigError::ContextParse { .. } => {
            eprintln!("\nThe --context file must contain a single JSON value.");
        }
        _ => {}
    }
}

/// Installs the global `tracing` subscriber.
///
/// Logs go to stderr; stdout is reserved for JSON output.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
