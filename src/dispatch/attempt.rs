//! Single-attempt execution.

use std::time::Duration;

use tokio::time::Instant;

use super::{
    AttemptRecord, DispatchStatus, FailureKind, HttpClient, HttpError, HttpRequest, HttpResponse,
    NetworkErrorCode, ResponseBody,
};
use crate::time::as_millis_u64;

/// Normalised outcome of one HTTP attempt.
///
/// Every way an attempt can end (2xx, non-2xx, transport failure,
/// deadline) is represented here; nothing escapes as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptOutcome {
    /// Classification
    pub status: DispatchStatus,
    /// HTTP status, when a response was received
    pub http_status: Option<u16>,
    /// Response payload, when a non-empty body was received
    pub response_body: Option<ResponseBody>,
    /// Wall-clock duration of the attempt
    pub elapsed: Duration,
    /// Failure kind, when the attempt failed
    pub failure: Option<FailureKind>,
    /// Transport error classification, for network failures and timeouts
    pub error_code: Option<NetworkErrorCode>,
    /// Failure description
    pub error_message: Option<String>,
}

impl AttemptOutcome {
    /// Returns true for a 2xx response.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == DispatchStatus::Success
    }

    /// Snapshot of this outcome as an attempt history entry.
    #[must_use]
    pub fn record(&self, attempt_number: u32) -> AttemptRecord {
        AttemptRecord {
            attempt_number,
            status: self.status,
            http_status_code: self.http_status,
            execution_time_ms: as_millis_u64(self.elapsed),
            failure: self.failure,
            error_message: self.error_message.clone(),
        }
    }

    fn from_response(response: &HttpResponse, elapsed: Duration) -> Self {
        let code = response.status.as_u16();
        let raw = response.body_text_lossy();
        let response_body = (!raw.is_empty()).then(|| ResponseBody::from_raw(raw));

        if response.is_success() {
            return Self {
                status: DispatchStatus::Success,
                http_status: Some(code),
                response_body,
                elapsed,
                failure: None,
                error_code: None,
                error_message: None,
            };
        }

        let reason = response.status.canonical_reason().unwrap_or("Unknown Status");
        Self {
            status: DispatchStatus::Error,
            http_status: Some(code),
            response_body,
            elapsed,
            failure: Some(FailureKind::Http),
            error_code: None,
            error_message: Some(format!("HTTP {code} {reason}")),
        }
    }

    fn timed_out(elapsed: Duration, message: String) -> Self {
        Self {
            status: DispatchStatus::Timeout,
            http_status: None,
            response_body: None,
            elapsed,
            failure: Some(FailureKind::Timeout),
            error_code: Some(NetworkErrorCode::Timeout),
            error_message: Some(message),
        }
    }

    fn from_error(error: &HttpError, elapsed: Duration) -> Self {
        match error.code() {
            Some(NetworkErrorCode::Timeout | NetworkErrorCode::Aborted) => {
                let mut outcome = Self::timed_out(elapsed, error.to_string());
                outcome.error_code = error.code();
                outcome
            }
            code => Self {
                status: DispatchStatus::Error,
                http_status: None,
                response_body: None,
                elapsed,
                failure: Some(FailureKind::Network),
                error_code: code,
                error_message: Some(error.to_string()),
            },
        }
    }
}

/// Issues exactly one request, bounded by `timeout`.
///
/// Any HTTP status is a result, not an error. A deadline hit or an
/// aborted connection is classified as [`DispatchStatus::Timeout`]
/// whether or not any bytes arrived. Elapsed time is always recorded.
pub async fn execute_attempt<H: HttpClient>(
    client: &H,
    request: HttpRequest,
    timeout: Duration,
) -> AttemptOutcome {
    let started = Instant::now();
    let result = tokio::time::timeout(timeout, client.request(request)).await;
    let elapsed = started.elapsed();

    match result {
        Err(_) => AttemptOutcome::timed_out(
            elapsed,
            format!("Request timed out after {}ms", as_millis_u64(timeout)),
        ),
        Ok(Err(e)) => AttemptOutcome::from_error(&e, elapsed),
        Ok(Ok(response)) => AttemptOutcome::from_response(&response, elapsed),
    }
}
