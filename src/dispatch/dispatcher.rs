//! Retry orchestration around single attempts.

use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use super::{
    AttemptOutcome, AttemptRecord, DispatchConfig, DispatchError, DispatchRequest,
    DispatchResult, HttpClient, HttpRequest, Jitter, RandomJitter, RetryPolicy, build_request,
    execute_attempt,
};
use crate::guard::{redact_url, validate_url};
use crate::template::Renderer;
use crate::time::{Sleeper, TokioSleeper};

/// Dispatches templated HTTP calls with SSRF guarding and retries.
///
/// A dispatcher holds only its collaborators (HTTP client, sleeper,
/// jitter source, template renderer); every dispatch owns its own
/// attempt history, so one dispatcher can serve many concurrent calls.
///
/// # Flow
///
/// 1. Render the URL and validate it once. A rejection returns a failed
///    result with zero attempts.
/// 2. Render headers, body and params into a request.
/// 3. Attempt, and on a retryable failure wait
///    `min(initial * multiplier^(n-1), max)` ±25% before attempt `n + 1`.
/// 4. Stop on the first success, a non-retryable failure, or when
///    `max_retries` is exhausted.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper for backoff waits (defaults to [`TokioSleeper`])
/// - `J`: The jitter source (defaults to [`RandomJitter`])
///
/// # Example
///
/// ```no_run
/// use webhook_dispatch::dispatch::{DispatchConfig, Dispatcher, ReqwestClient, RetryPolicy};
/// use serde_json::json;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), webhook_dispatch::dispatch::DispatchError> {
/// let dispatcher = Dispatcher::new(ReqwestClient::new());
/// let config = DispatchConfig::new("https://api.example.com/contacts/{{contact.id}}");
/// let context = json!({ "contact": { "id": 42 } });
///
/// let result = dispatcher
///     .dispatch(&config, &context, Duration::from_secs(10), &RetryPolicy::default())
///     .await?;
/// println!("success={} retries={}", result.success, result.retries_used);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Dispatcher<H, S = TokioSleeper, J = RandomJitter> {
    client: H,
    sleeper: S,
    jitter: J,
    renderer: Renderer,
}

impl<H> Dispatcher<H, TokioSleeper, RandomJitter> {
    /// Creates a dispatcher with tokio timers and random jitter.
    #[must_use]
    pub fn new(client: H) -> Self {
        Self {
            client,
            sleeper: TokioSleeper,
            jitter: RandomJitter,
            renderer: Renderer::new(),
        }
    }
}

impl<H, S, J> Dispatcher<H, S, J> {
    /// Sets a custom sleeper for backoff waits.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> Dispatcher<H, S2, J> {
        Dispatcher {
            client: self.client,
            sleeper,
            jitter: self.jitter,
            renderer: self.renderer,
        }
    }

    /// Sets a custom jitter source.
    #[must_use]
    pub fn with_jitter<J2>(self, jitter: J2) -> Dispatcher<H, S, J2> {
        Dispatcher {
            client: self.client,
            sleeper: self.sleeper,
            jitter,
            renderer: self.renderer,
        }
    }

    /// Returns the HTTP client.
    #[must_use]
    pub const fn client(&self) -> &H {
        &self.client
    }

    /// Renders, validates and builds the request without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UrlRejected`] when the rendered URL is
    /// refused, [`DispatchError::InvalidHeader`] for an illegal header name,
    /// or [`DispatchError::InvalidHeaderValue`] when a rendered value is
    /// not legal.
    pub fn prepare(
        &self,
        config: &DispatchConfig,
        context: &Value,
    ) -> Result<DispatchRequest, DispatchError> {
        let rendered_url = self.renderer.render(&config.url, context);
        let url = validate_url(&rendered_url)?;
        build_request(config, url, &self.renderer, context)
    }
}

impl<H: HttpClient, S: Sleeper, J: Jitter> Dispatcher<H, S, J> {
    /// Dispatches one templated request, retrying per `policy`.
    ///
    /// Network failures, timeouts, non-2xx statuses and URL rejections are
    /// all reported through the returned [`DispatchResult`].
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] only for caller mistakes: a malformed
    /// policy, a zero timeout, or an illegal header name. A rejected URL or
    /// a header value broken by the context is reported as a failed result.
    pub async fn dispatch(
        &self,
        config: &DispatchConfig,
        context: &Value,
        timeout: Duration,
        policy: &RetryPolicy,
    ) -> Result<DispatchResult, DispatchError> {
        let started = Instant::now();
        policy.validate()?;
        if timeout.is_zero() {
            return Err(DispatchError::ZeroTimeout);
        }

        let request = match self.prepare(config, context) {
            Ok(request) => request,
            Err(DispatchError::UrlRejected(reason)) => {
                tracing::warn!("Dispatch rejected before sending: {reason}");
                return Ok(DispatchResult::rejected(&reason, started.elapsed()));
            }
            Err(e @ DispatchError::InvalidHeaderValue { .. }) => {
                tracing::warn!("Dispatch rejected before sending: {e}");
                return Ok(DispatchResult::rejected(&e, started.elapsed()));
            }
            Err(e) => return Err(e),
        };

        let http_request = request.to_http();
        tracing::info!(
            "Dispatching {} {} (timeout {}ms, max retries {})",
            request.method,
            redact_url(&request.url),
            timeout.as_millis(),
            policy.max_retries
        );

        let result = if policy.max_retries == 0 {
            let outcome = execute_attempt(&self.client, http_request, timeout).await;
            let record = outcome.record(1);
            DispatchResult::from_outcome(outcome, vec![record], started.elapsed())
        } else {
            let (outcome, attempts) = self.run_with_retry(&http_request, timeout, policy).await;
            DispatchResult::from_outcome(outcome, attempts, started.elapsed())
        };

        log_completion(&result);
        Ok(result)
    }

    /// Attempts until success, a non-retryable failure, or exhaustion.
    async fn run_with_retry(
        &self,
        request: &HttpRequest,
        timeout: Duration,
        policy: &RetryPolicy,
    ) -> (AttemptOutcome, Vec<AttemptRecord>) {
        let mut attempts = Vec::new();
        let mut attempt_index: u32 = 0;

        loop {
            let outcome = execute_attempt(&self.client, request.clone(), timeout).await;
            attempts.push(outcome.record(attempt_index + 1));
            tracing::debug!(
                "Attempt {} finished: {:?} (HTTP {:?}) in {}ms",
                attempt_index + 1,
                outcome.status,
                outcome.http_status,
                outcome.elapsed.as_millis()
            );

            if outcome.is_success()
                || !policy.should_retry(attempt_index)
                || !policy.is_retryable(&outcome)
            {
                return (outcome, attempts);
            }

            let delay = policy.jittered_delay(attempt_index, self.jitter.sample());
            tracing::warn!(
                "Attempt {} failed ({}), retrying in {}ms",
                attempt_index + 1,
                outcome.error_message.as_deref().unwrap_or("unknown error"),
                delay.as_millis()
            );
            self.sleeper.sleep(delay).await;
            attempt_index += 1;
        }
    }
}

fn log_completion(result: &DispatchResult) {
    if result.success {
        tracing::info!(
            "Dispatch succeeded with HTTP {} after {} attempt(s) in {}ms",
            result.http_status_code.unwrap_or_default(),
            result.attempts.len(),
            result.total_execution_time_ms
        );
    } else {
        tracing::warn!(
            "Dispatch failed after {} attempt(s): {}",
            result.attempts.len(),
            result.error_message.as_deref().unwrap_or("unknown error")
        );
    }
}
