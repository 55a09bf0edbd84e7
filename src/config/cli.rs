//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::defaults;

/// webhook-dispatch: templated outbound HTTP calls
///
/// Renders a request from a TOML definition and a JSON context, refuses
/// internal destinations, retries transient failures with jittered
/// backoff, and prints the result as JSON.
#[derive(Debug, Parser)]
#[command(name = "webhook-dispatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for webhook-dispatch
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render and send a request, printing the dispatch result
    Send(SendArgs),

    /// Check whether a URL is an allowed destination
    CheckUrl {
        /// URL to check
        url: String,
    },

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE_NAME)]
        output: PathBuf,
    },
}

/// Arguments for the `send` subcommand.
///
/// Every request option may come from the config file; flags given here
/// take precedence.
#[derive(Debug, Default, Args)]
pub struct SendArgs {
    /// Path to the request definition (TOML)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Path to the template context (JSON)
    #[arg(long = "context", value_name = "FILE")]
    pub context: Option<PathBuf>,

    /// URL template
    #[arg(long)]
    pub url: Option<String>,

    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    #[arg(long)]
    pub method: Option<String>,

    /// Header templates in 'Key=Value' or 'Key: Value' format (can be specified multiple times)
    #[arg(long = "header", value_name = "K=V")]
    pub headers: Vec<String>,

    /// Per-attempt timeout in milliseconds
    #[arg(long = "timeout-ms")]
    pub timeout_ms: Option<u64>,

    /// Maximum number of retries after the first attempt
    #[arg(long = "retry-max")]
    pub retry_max: Option<u32>,

    /// Initial retry delay in milliseconds
    #[arg(long = "retry-delay-ms")]
    pub retry_delay_ms: Option<u64>,

    /// Render and validate the request without sending it
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
