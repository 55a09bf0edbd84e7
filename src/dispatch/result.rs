//! Dispatch outcome types.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::AttemptOutcome;
use crate::time::as_millis_u64;

/// Maximum number of characters kept in a result's response text.
pub const MAX_RESPONSE_TEXT_CHARS: usize = 10_000;

/// Overall classification of an attempt or a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStatus {
    /// 2xx response
    Success,
    /// Non-2xx response, transport failure, or rejected URL
    Error,
    /// The attempt exceeded its deadline or was aborted
    Timeout,
}

/// Which kind of failure ended an attempt or dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// The URL guard rejected the destination.
    Validation,
    /// DNS or connection failure.
    Network,
    /// The attempt exceeded its deadline.
    Timeout,
    /// The server answered with a non-2xx status.
    Http,
}

/// A response payload in both raw and decoded form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseBody {
    /// Body as received (lossy UTF-8)
    pub raw: String,
    /// Parsed JSON, or the raw text as a JSON string when it is not JSON
    pub decoded: Value,
}

impl ResponseBody {
    /// Decodes a raw payload, keeping the text when it is not JSON.
    #[must_use]
    pub fn from_raw(raw: String) -> Self {
        let decoded = serde_json::from_str::<Value>(&raw)
            .unwrap_or_else(|_| Value::String(raw.clone()));
        Self { raw, decoded }
    }

    /// Returns true when the payload parsed as JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        !matches!(&self.decoded, Value::String(s) if *s == self.raw)
    }

    /// Text form for logs: compact JSON when decoded, else the raw text,
    /// truncated to [`MAX_RESPONSE_TEXT_CHARS`] characters.
    #[must_use]
    pub fn truncated_text(&self) -> String {
        let text = if self.is_json() {
            self.decoded.to_string()
        } else {
            self.raw.clone()
        };
        truncate_chars(text, MAX_RESPONSE_TEXT_CHARS)
    }
}

/// Truncates to at most `max` characters without splitting a code point.
#[must_use]
pub fn truncate_chars(text: String, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text,
    }
}

/// One HTTP attempt within a dispatch. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    /// 1-based attempt number
    pub attempt_number: u32,
    /// Outcome classification
    pub status: DispatchStatus,
    /// HTTP status, when a response was received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status_code: Option<u16>,
    /// Wall-clock duration of the attempt
    pub execution_time_ms: u64,
    /// Failure kind, when the attempt failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    /// Failure description, when the attempt failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Outcome of a whole dispatch, including every attempt made.
///
/// `attempts.len() == retries_used + 1` whenever a request was issued;
/// `attempts` is empty only when the URL guard rejected the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    /// True iff the final attempt got a 2xx response
    pub success: bool,
    /// Classification of the final attempt (or `error` when rejected)
    pub status: DispatchStatus,
    /// HTTP status of the final attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status_code: Option<u16>,
    /// Response body of the final attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<ResponseBody>,
    /// Truncated text of the final response, for logs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated_response_text: Option<String>,
    /// Duration of the final attempt
    pub execution_time_ms: u64,
    /// Duration of the whole dispatch, including backoff waits
    pub total_execution_time_ms: u64,
    /// Every attempt, in order
    pub attempts: Vec<AttemptRecord>,
    /// Attempts made beyond the first
    pub retries_used: u32,
    /// Failure kind of the final attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    /// Failure description of the final attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl DispatchResult {
    /// Result for a request refused before sending: no attempts.
    ///
    /// Covers a URL refused by the guard and a header value made illegal
    /// by the context.
    #[must_use]
    pub fn rejected(reason: &dyn fmt::Display, total: Duration) -> Self {
        Self {
            success: false,
            status: DispatchStatus::Error,
            http_status_code: None,
            response_body: None,
            truncated_response_text: None,
            execution_time_ms: 0,
            total_execution_time_ms: as_millis_u64(total),
            attempts: Vec::new(),
            retries_used: 0,
            failure: Some(FailureKind::Validation),
            error_message: Some(reason.to_string()),
        }
    }

    /// Result built from the final attempt and the full attempt history.
    #[must_use]
    pub fn from_outcome(last: AttemptOutcome, attempts: Vec<AttemptRecord>, total: Duration) -> Self {
        let retries_used = u32::try_from(attempts.len().saturating_sub(1)).unwrap_or(u32::MAX);
        let truncated_response_text = last.response_body.as_ref().map(ResponseBody::truncated_text);

        Self {
            success: last.is_success(),
            status: last.status,
            http_status_code: last.http_status,
            response_body: last.response_body,
            truncated_response_text,
            execution_time_ms: as_millis_u64(last.elapsed),
            total_execution_time_ms: as_millis_u64(total),
            attempts,
            retries_used,
            failure: last.failure,
            error_message: last.error_message,
        }
    }
}
