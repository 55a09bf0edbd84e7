//! Wire-level HTTP request/response types and client trait.

use super::HttpError;

/// A fully-built HTTP request, ready to send.
///
/// Query parameters are already encoded into `url` and the body is
/// serialised to bytes. Uses standard `http` crate types for method and
/// headers, ensuring compatibility with the broader ecosystem.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: http::Method,
    /// Target URL, including query string
    pub url: url::Url,
    /// HTTP headers to send
    pub headers: http::HeaderMap,
    /// Optional request body
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// A bodiless request with no headers.
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: http::HeaderMap::new(),
            body: None,
        }
    }

    /// Attaches an already-encoded body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a header, replacing any existing value for the name.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns the body as UTF-8 text, if present and valid.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        self.body
            .as_deref()
            .and_then(|b| std::str::from_utf8(b).ok())
    }
}

/// A buffered response. Any status, including 4xx and 5xx, arrives here.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: http::StatusCode,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Payload bytes
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Assembles a response from its parts.
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Creates a response with the given status and body and no headers.
    #[must_use]
    pub fn with_status(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let status =
            http::StatusCode::from_u16(status).unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, http::HeaderMap::new(), body.into())
    }

    /// 2xx check.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn body_text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport seam between the executor and an HTTP library.
///
/// Implementations must return non-2xx responses as `Ok`; only transport
/// failures are errors. Scripted implementations stand in for the
/// network in tests.
///
/// # Example
///
/// ```ignore
/// use webhook_dispatch::dispatch::{HttpClient, HttpRequest, HttpResponse, HttpError};
///
/// struct AlwaysAccepted;
///
/// impl HttpClient for AlwaysAccepted {
///     async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
///         Ok(HttpResponse::with_status(202, r#"{"queued":true}"#))
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Performs one round trip.
    ///
    /// # Errors
    ///
    /// [`HttpError::Connection`] for DNS or socket failures,
    /// [`HttpError::Timeout`] when the library gives up waiting, and
    /// [`HttpError::InvalidRequest`] when the request cannot be encoded.
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}
