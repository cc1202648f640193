//! The HTTP capability the proxy runs on.
//!
//! The session handshake needs raw access to multi-valued `set-cookie` headers and to
//! response bodies regardless of status, so requests go through the small
//! [`HttpTransport`] trait instead of a bare `reqwest::Client`. [`ReqwestTransport`]
//! is the default implementation.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::core::YfError;

/// Upper bound of the response-header block hyper will buffer before giving up
/// (its default h1 read buffer ceiling).
pub const REQWEST_HEADER_TOLERANCE: usize = 8192 + 4096 * 100;

/// Minimal HTTP method set the proxy needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

/// An outgoing request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .push((name.into().to_ascii_lowercase(), value.into()));
        self
    }
}

/// A response with every header preserved, including repeated ones.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are lower-cased; repeated headers appear once per value.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// All values of the header `name` (case-insensitive), in arrival order.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Performs a single HTTP exchange.
///
/// Implementations must return non-2xx responses as `Ok` so that callers can act on
/// the status; `Err` is reserved for failures to complete the exchange at all.
pub trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, YfError>> + Send + 'a>>;

    /// Largest response-header block, in bytes, this transport accepts.
    fn max_response_header_bytes(&self) -> usize;
}

/// [`HttpTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Builds the underlying client with the given UA and optional timeouts.
    ///
    /// The cookie store stays disabled: the session cookie is attached explicitly so
    /// that invalidating the session really forgets it.
    pub fn new(
        user_agent: &str,
        timeout: Option<Duration>,
        connect_timeout: Option<Duration>,
    ) -> Result<Self, YfError> {
        let mut httpb = Client::builder().user_agent(user_agent);
        if let Some(t) = timeout {
            httpb = httpb.timeout(t);
        }
        if let Some(ct) = connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }
        Ok(Self {
            http: httpb.build()?,
        })
    }

    /// Wrap an already configured `reqwest::Client`.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, YfError>> + Send + 'a>> {
        Box::pin(async move {
            let mut builder = match request.method {
                HttpMethod::Get => self.http.get(request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }

            // The URL may carry the crumb; keep it out of error messages.
            let resp = builder.send().await.map_err(reqwest::Error::without_url)?;

            let status = resp.status().as_u16();
            let headers = resp
                .headers()
                .iter()
                .filter_map(|(k, v)| {
                    v.to_str()
                        .ok()
                        .map(|v| (k.as_str().to_ascii_lowercase(), v.to_string()))
                })
                .collect();
            let body = resp.text().await.map_err(reqwest::Error::without_url)?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        })
    }

    fn max_response_header_bytes(&self) -> usize {
        REQWEST_HEADER_TOLERANCE
    }
}
