//! webhook-dispatch: templated outbound HTTP calls
//!
//! Entry point for the webhook-dispatch application.

use std::process::ExitCode;

use webhook_dispatch::config::{Cli, Command, SendArgs, ValidatedConfig, write_default_config};

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match &cli.command {
        Command::Init { output } => handle_init(output),
        Command::CheckUrl { url } => {
            setup_tracing(cli.verbose);
            handle_check_url(url)
        }
        Command::Send(args) => handle_send(args, cli.verbose),
    }
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Handles the `check-url` subcommand.
fn handle_check_url(url: &str) -> ExitCode {
    match run::check_url_report(url) {
        Ok((output, valid)) => {
            println!("{output}");
            if valid {
                exit_code::SUCCESS
            } else {
                exit_code::CONFIG_ERROR
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Handles the `send` subcommand.
///
/// Excluded from coverage - requires async runtime and network access.
#[cfg(not(tarpaulin_include))]
fn handle_send(args: &SendArgs, verbose: bool) -> ExitCode {
    // Load and validate configuration
    let config = match ValidatedConfig::load(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    // Setup logging and run
    setup_tracing(verbose);
    tracing::info!("{config}");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {e}");
            return exit_code::dispatch_failed();
        }
    };

    match runtime.block_on(run::execute(config)) {
        Ok(true) => exit_code::SUCCESS,
        Ok(false) => exit_code::dispatch_failed(),
        Err(e) => {
            tracing::error!("{e}");
            exit_code::CONFIG_ERROR
        }
    }
}
