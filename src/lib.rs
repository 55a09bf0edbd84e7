//! webhook-dispatch: templated outbound HTTP calls.
//!
//! A library for sending workflow-driven webhooks: a request definition
//! with `{{path}}` placeholders is rendered against a runtime context,
//! the destination is checked against internal and metadata addresses,
//! transient failures are retried with jittered exponential backoff, and
//! fields can be extracted from the response.

pub mod config;
pub mod dispatch;
pub mod extract;
pub mod guard;
pub mod template;
pub mod time;
