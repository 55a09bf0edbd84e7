//! Tests for validated configuration.

use serde_json::{Value, json};

use super::ConfigError;
use super::cli::{Cli, Command, SendArgs};
use super::toml::TomlConfig;
use super::validated::ValidatedConfig;

/// Helper to parse `send` args from a slice
fn send(args: &[&str]) -> SendArgs {
    let mut full_args = vec!["webhook-dispatch", "send"];
    full_args.extend(args);
    match Cli::parse_from_iter(full_args).command {
        Command::Send(args) => args,
        other => panic!("expected send command, got {other:?}"),
    }
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

fn empty_context() -> Value {
    json!({})
}

mod request_tests;
