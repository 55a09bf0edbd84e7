//! Command execution.
//!
//! Builds the dispatcher from validated config, runs a dispatch (or a dry
//! run), and renders the JSON printed on stdout.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use webhook_dispatch::config::ValidatedConfig;
use webhook_dispatch::dispatch::{
    Body, DispatchError, DispatchRequest, DispatchResult, Dispatcher, HttpClient, Jitter,
    ReqwestClient,
};
use webhook_dispatch::extract::{ExtractError, FieldMapping, extract_fields};
use webhook_dispatch::guard::check_url;
use webhook_dispatch::time::Sleeper;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The dispatcher refused the request before sending.
    #[error("Failed to dispatch: {0}")]
    Dispatch(#[from] DispatchError),

    /// Field extraction failed.
    #[error("Failed to extract response fields: {0}")]
    Extract(#[from] ExtractError),

    /// The report could not be serialised.
    #[error("Failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Output of `send`: the dispatch result plus any extracted fields.
#[derive(Debug, Serialize)]
pub struct SendReport {
    #[serde(flatten)]
    pub result: DispatchResult,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted: Option<Map<String, Value>>,
}

impl SendReport {
    /// Builds the report, extracting fields only from a successful dispatch.
    fn new(result: DispatchResult, mappings: &[FieldMapping]) -> Result<Self, ExtractError> {
        let extracted = if result.success && !mappings.is_empty() {
            Some(extract_fields(&result, mappings)?)
        } else {
            None
        };
        Ok(Self { result, extracted })
    }
}

/// Output of `send --dry-run`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DryRunReport {
    pub dry_run: bool,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<PreparedRequest>,
}

/// The request a dispatch would send, in printable form.
#[derive(Debug, Serialize)]
pub struct PreparedRequest {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl From<&DispatchRequest> for PreparedRequest {
    fn from(request: &DispatchRequest) -> Self {
        let http = request.to_http();
        let headers = http
            .headers
            .iter()
            .map(|(name, value)| {
                let value = value.to_str().unwrap_or("<non-ascii>");
                (name.as_str().to_string(), value.to_string())
            })
            .collect();

        let body = request.body.as_ref().map(|body| match body {
            Body::Structured(value) => value.clone(),
            Body::Text(text) => Value::String(text.clone()),
        });

        Self {
            method: request.method.to_string(),
            url: http.url.to_string(),
            headers,
            body,
        }
    }
}

/// Executes `send` with the production HTTP client and prints the report.
///
/// Returns whether the dispatch (or dry run) succeeded.
///
/// # Errors
///
/// Returns an error for caller mistakes the config layer cannot catch,
/// or when the report cannot be serialised.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<bool, RunError> {
    let dispatcher = Dispatcher::new(ReqwestClient::new());

    if config.dry_run {
        tracing::info!("Dry-run mode enabled - the request will be built but not sent");
    }

    let (output, success) = run_send(&dispatcher, &config).await?;
    println!("{output}");
    Ok(success)
}

/// Runs one `send` against any dispatcher and renders the JSON report.
async fn run_send<H, S, J>(
    dispatcher: &Dispatcher<H, S, J>,
    config: &ValidatedConfig,
) -> Result<(String, bool), RunError>
where
    H: HttpClient,
    S: Sleeper,
    J: Jitter,
{
    if config.dry_run {
        let report = dry_run_report(dispatcher, config)?;
        return Ok((serde_json::to_string_pretty(&report)?, report.valid));
    }

    let result = dispatcher
        .dispatch(
            &config.dispatch,
            &config.context,
            config.timeout,
            &config.retry_policy,
        )
        .await?;

    let report = SendReport::new(result, &config.extract)?;
    let success = report.result.success;
    Ok((serde_json::to_string_pretty(&report)?, success))
}

fn dry_run_report<H, S, J>(
    dispatcher: &Dispatcher<H, S, J>,
    config: &ValidatedConfig,
) -> Result<DryRunReport, DispatchError> {
    match dispatcher.prepare(&config.dispatch, &config.context) {
        Ok(request) => Ok(DryRunReport {
            dry_run: true,
            valid: true,
            reason: None,
            request: Some(PreparedRequest::from(&request)),
        }),
        Err(e @ (DispatchError::UrlRejected(_) | DispatchError::InvalidHeaderValue { .. })) => {
            Ok(DryRunReport {
                dry_run: true,
                valid: false,
                reason: Some(rejection_reason(&e)),
                request: None,
            })
        }
        Err(e) => Err(e),
    }
}

/// Text of a pre-send rejection, without the error-kind prefix for URLs.
fn rejection_reason(error: &DispatchError) -> String {
    match error {
        DispatchError::UrlRejected(reason) => reason.to_string(),
        other => other.to_string(),
    }
}

/// Runs `check-url`, returning the JSON verdict and whether the URL is allowed.
///
/// # Errors
///
/// Returns an error only if the verdict cannot be serialised.
pub fn check_url_report(url: &str) -> Result<(String, bool), RunError> {
    let check = check_url(url);
    if let Some(ref reason) = check.reason {
        tracing::debug!("URL rejected: {reason}");
    }
    Ok((serde_json::to_string(&check)?, check.valid))
}
