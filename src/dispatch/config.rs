//! Declarative description of one outbound call.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// HTTP methods a dispatch may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DispatchMethod {
    /// `GET`; a structured body is sent as query parameters instead.
    #[serde(alias = "get")]
    Get,
    /// `POST`
    #[default]
    #[serde(alias = "post")]
    Post,
    /// `PUT`
    #[serde(alias = "put")]
    Put,
    /// `PATCH`
    #[serde(alias = "patch")]
    Patch,
    /// `DELETE`
    #[serde(alias = "delete")]
    Delete,
}

impl DispatchMethod {
    /// Returns the uppercase method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Converts to the `http` crate's method type.
    #[must_use]
    pub const fn to_http(self) -> http::Method {
        match self {
            Self::Get => http::Method::GET,
            Self::Post => http::Method::POST,
            Self::Put => http::Method::PUT,
            Self::Patch => http::Method::PATCH,
            Self::Delete => http::Method::DELETE,
        }
    }
}

impl fmt::Display for DispatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DispatchMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(format!("unsupported method '{s}'")),
        }
    }
}

/// One outbound call as declared by a workflow step.
///
/// String fields are templates resolved against the dispatch context.
/// The config is never mutated by a dispatch.
///
/// # Example
///
/// ```
/// use webhook_dispatch::dispatch::{DispatchConfig, DispatchMethod};
/// use serde_json::json;
///
/// let config = DispatchConfig::new("https://api.example.com/deals/{{deal.id}}")
///     .with_method(DispatchMethod::Put)
///     .with_header("Authorization", "Bearer {{secrets.token}}")
///     .with_body(json!({ "stage": "{{deal.stage}}" }));
///
/// assert_eq!(config.method, DispatchMethod::Put);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// URL template
    pub url: String,

    /// HTTP method (default: POST)
    #[serde(default)]
    pub method: DispatchMethod,

    /// Header templates; names are literal, values are templates
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,

    /// Body: a string template, or a JSON value whose string leaves are templates
    #[serde(default)]
    pub body: Option<Value>,

    /// Query parameters whose string leaves are templates
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
}

impl DispatchConfig {
    /// Creates a POST config with no headers, body, or params.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: DispatchMethod::default(),
            headers: None,
            body: None,
            params: None,
        }
    }

    /// Sets the HTTP method.
    #[must_use]
    pub const fn with_method(mut self, method: DispatchMethod) -> Self {
        self.method = method;
        self
    }

    /// Adds a header template.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: Value) -> Self {
        self.params
            .get_or_insert_with(Map::new)
            .insert(name.into(), value);
        self
    }
}
