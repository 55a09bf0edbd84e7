//! Production HTTP client implementation using reqwest.

use std::error::Error as StdError;
use std::io;

use super::{HttpClient, HttpError, HttpRequest, HttpResponse, NetworkErrorCode};

/// Production HTTP client using reqwest.
///
/// A thin wrapper around `reqwest::Client` that implements [`HttpClient`].
/// Redirects are not followed: the guard validated the original URL only,
/// and a redirect could point anywhere.
///
/// # Example
///
/// ```no_run
/// use webhook_dispatch::dispatch::{HttpClient, HttpRequest, ReqwestClient};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let url = Url::parse("https://api.example.com/webhook")?;
/// let request = HttpRequest::new(http::Method::POST, url).with_body(b"{}".to_vec());
/// let response = client.request(request).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new HTTP client that does not follow redirects.
    ///
    /// Falls back to reqwest's default client if the builder fails
    /// (which only happens when the TLS backend cannot initialise).
    #[must_use]
    pub fn new() -> Self {
        let inner = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client ({e}), using defaults");
                reqwest::Client::new()
            });
        Self { inner }
    }

    /// Creates an HTTP client from an existing reqwest client.
    ///
    /// Useful when you need custom configuration (proxies, TLS, etc.).
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self.inner.request(req.method, req.url.as_str());

        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(classify)?.to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}

/// Maps a reqwest error onto [`HttpError`].
fn classify(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        return HttpError::Timeout;
    }
    if e.is_builder() {
        return HttpError::InvalidRequest(e.to_string());
    }
    let code = network_error_code(&e);
    HttpError::connection(code, e)
}

/// Walks the source chain looking for an I/O kind or resolver message.
pub(super) fn network_error_code(error: &(dyn StdError + 'static)) -> NetworkErrorCode {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);
    let mut saw_dns = false;

    while let Some(err) = current {
        if let Some(code) = err
            .downcast_ref::<io::Error>()
            .and_then(|io_err| io_kind_code(io_err.kind()))
        {
            return code;
        }

        let message = err.to_string().to_ascii_lowercase();
        if let Some(code) = resolver_message_code(&message) {
            return code;
        }
        saw_dns |= message.contains("dns error") || message.contains("failed to lookup address");

        current = err.source();
    }

    if saw_dns {
        NetworkErrorCode::HostNotFound
    } else {
        NetworkErrorCode::Other
    }
}

const fn io_kind_code(kind: io::ErrorKind) -> Option<NetworkErrorCode> {
    match kind {
        io::ErrorKind::ConnectionReset | io::ErrorKind::BrokenPipe => {
            Some(NetworkErrorCode::ConnectionReset)
        }
        io::ErrorKind::ConnectionRefused => Some(NetworkErrorCode::ConnectionRefused),
        io::ErrorKind::ConnectionAborted => Some(NetworkErrorCode::Aborted),
        io::ErrorKind::TimedOut => Some(NetworkErrorCode::Timeout),
        _ => None,
    }
}

fn resolver_message_code(message: &str) -> Option<NetworkErrorCode> {
    const TRANSIENT: &[&str] = &[
        "temporary failure in name resolution",
        "try again",
        "eai_again",
    ];
    const NOT_FOUND: &[&str] = &[
        "name or service not known",
        "nodename nor servname provided",
        "no such host",
        "eai_noname",
    ];

    if TRANSIENT.iter().any(|m| message.contains(m)) {
        Some(NetworkErrorCode::DnsRetry)
    } else if NOT_FOUND.iter().any(|m| message.contains(m)) {
        Some(NetworkErrorCode::HostNotFound)
    } else {
        None
    }
}
