//! Outbound dispatch engine.
//!
//! This module provides types and traits for:
//! - Declaring a templated call ([`DispatchConfig`], [`DispatchMethod`])
//! - Building concrete requests ([`build_request`], [`DispatchRequest`], [`Body`])
//! - Abstracting HTTP clients ([`HttpClient`], [`HttpRequest`], [`HttpResponse`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - Executing a single attempt ([`execute_attempt`], [`AttemptOutcome`])
//! - Retry policy configuration ([`RetryPolicy`], [`Jitter`])
//! - Orchestrating retries ([`Dispatcher`])
//! - Reporting outcomes ([`DispatchResult`], [`AttemptRecord`])

mod attempt;
mod client;
mod config;
mod dispatcher;
mod error;
mod http;
mod request;
mod result;
mod retry;

#[cfg(test)]
mod attempt_tests;
#[cfg(test)]
mod test_support;

pub use attempt::{AttemptOutcome, execute_attempt};
pub use client::ReqwestClient;
pub use config::{DispatchConfig, DispatchMethod};
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, HttpError, NetworkErrorCode, PolicyError};
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use request::{Body, DEFAULT_USER_AGENT, DispatchRequest, build_request};
pub use result::{
    AttemptRecord, DispatchResult, DispatchStatus, FailureKind, MAX_RESPONSE_TEXT_CHARS,
    ResponseBody, truncate_chars,
};
pub use retry::{FixedJitter, Jitter, RandomJitter, RetryPolicy};
