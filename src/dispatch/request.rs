//! Request building: rendered config to concrete request.

use http::header::{CONTENT_TYPE, HeaderName, HeaderValue, USER_AGENT};
use http::HeaderMap;
use serde_json::{Map, Value};
use url::Url;

use super::{DispatchConfig, DispatchError, DispatchMethod, HttpRequest};
use crate::template::Renderer;

/// User agent sent unless the config overrides it.
pub const DEFAULT_USER_AGENT: &str = concat!("webhook-dispatch/", env!("CARGO_PKG_VERSION"));

/// A resolved request body.
///
/// Resolved once per dispatch so later stages never re-probe its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Text that did not parse as JSON; sent verbatim.
    Text(String),
    /// JSON; serialised compactly on the wire.
    Structured(Value),
}

impl Body {
    /// Serialises the body for the wire.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.clone().into_bytes(),
            Self::Structured(value) => value.to_string().into_bytes(),
        }
    }
}

/// A request after rendering and validation, before wire encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRequest {
    /// Guard-approved URL (without the params below)
    pub url: Url,
    /// HTTP method
    pub method: DispatchMethod,
    /// Default headers overlaid with rendered config headers
    pub headers: HeaderMap,
    /// Body to send; always `None` for GET
    pub body: Option<Body>,
    /// Query parameters (declared params unioned with GET body fields)
    pub params: Option<Map<String, Value>>,
}

impl DispatchRequest {
    /// Encodes params into the URL and the body into bytes.
    #[must_use]
    pub fn to_http(&self) -> HttpRequest {
        let mut url = self.url.clone();
        if let Some(params) = self.params.as_ref().filter(|p| !p.is_empty()) {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                append_query_value(&mut pairs, key, value);
            }
        }

        HttpRequest {
            method: self.method.to_http(),
            url,
            headers: self.headers.clone(),
            body: self.body.as_ref().map(Body::to_bytes),
        }
    }
}

fn append_query_value(
    pairs: &mut url::form_urlencoded::Serializer<'_, url::UrlQuery<'_>>,
    key: &str,
    value: &Value,
) {
    match value {
        Value::Null => {}
        Value::String(s) => {
            pairs.append_pair(key, s);
        }
        Value::Array(items) => {
            for item in items {
                append_query_value(pairs, key, item);
            }
        }
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => {
            pairs.append_pair(key, &value.to_string());
        }
    }
}

/// Builds a [`DispatchRequest`] from a config and an already-validated URL.
///
/// - Default headers (`Content-Type: application/json`, user agent) are
///   applied first; config headers replace them on conflict.
/// - A string body is rendered, then parsed as JSON when possible.
/// - A structured body is rendered leaf by leaf.
/// - For GET, an object body is merged into the query parameters and no
///   body is sent; any other GET body is dropped.
/// - Declared params are rendered and unioned with body-derived params;
///   declared params win on key collision.
///
/// # Errors
///
/// Returns [`DispatchError::InvalidHeader`] when a header name is not a
/// legal token, or [`DispatchError::InvalidHeaderValue`] when a rendered
/// value contains forbidden characters.
pub fn build_request(
    config: &DispatchConfig,
    url: Url,
    renderer: &Renderer,
    context: &Value,
) -> Result<DispatchRequest, DispatchError> {
    let headers = build_headers(config, renderer, context)?;
    let body = config
        .body
        .as_ref()
        .map(|body| resolve_body(body, renderer, context));

    let declared = config
        .params
        .as_ref()
        .map(|params| render_params(params, renderer, context));

    let (body, body_params) = match (config.method, body) {
        (DispatchMethod::Get, Some(Body::Structured(Value::Object(fields)))) => (None, Some(fields)),
        (DispatchMethod::Get, Some(_)) => {
            tracing::warn!("Dropping non-object body on GET request");
            (None, None)
        }
        (_, body) => (body, None),
    };

    let params = match (body_params, declared) {
        (None, None) => None,
        (Some(p), None) | (None, Some(p)) => Some(p),
        (Some(mut merged), Some(declared)) => {
            merged.extend(declared);
            Some(merged)
        }
    };

    Ok(DispatchRequest {
        url,
        method: config.method,
        headers,
        body,
        params,
    })
}

fn build_headers(
    config: &DispatchConfig,
    renderer: &Renderer,
    context: &Value,
) -> Result<HeaderMap, DispatchError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

    for (name, template) in config.headers.iter().flatten() {
        let header_name =
            name.trim()
                .parse::<HeaderName>()
                .map_err(|e| DispatchError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
        let rendered = renderer.render(template, context);
        let header_value =
            HeaderValue::from_str(&rendered).map_err(|e| DispatchError::InvalidHeaderValue {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

fn resolve_body(body: &Value, renderer: &Renderer, context: &Value) -> Body {
    match body {
        Value::String(template) => {
            let rendered = renderer.render(template, context);
            serde_json::from_str::<Value>(&rendered)
                .map_or_else(|_| Body::Text(rendered), Body::Structured)
        }
        structured => Body::Structured(renderer.render_deep(structured, context)),
    }
}

fn render_params(
    params: &Map<String, Value>,
    renderer: &Renderer,
    context: &Value,
) -> Map<String, Value> {
    params
        .iter()
        .map(|(k, v)| (k.clone(), renderer.render_deep(v, context)))
        .collect()
}
