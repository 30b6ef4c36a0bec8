use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::instrument;

/// An HTTP GET request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: Url,
    pub headers: HeaderMap,
    pub timeout: Duration,
}

/// An HTTP response with its body fully read.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

/// The HTTP transport used for bootstrap registry and RDAP server requests.
///
/// Connection level failures are reported as `Error::Transport`, any response received from a
/// server, whatever its status, is `Ok`.
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient {
    /// Perform a blocking HTTP GET request.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Determine whether a response was served from a local cache rather than by the origin server.
///
/// This depends on the caching layer, if any, placed in front of the `HttpClient`.
pub trait CacheDetector {
    fn is_cached(&self, response: &HttpResponse) -> bool;
}

impl<F> CacheDetector for F
where
    F: Fn(&HttpResponse) -> bool,
{
    fn is_cached(&self, response: &HttpResponse) -> bool {
        self(response)
    }
}

/// A `CacheDetector` which never reports a cached response.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoCache;

impl CacheDetector for NoCache {
    fn is_cached(&self, _response: &HttpResponse) -> bool {
        false
    }
}

/// A `CacheDetector` which looks for a marker header added by the caching layer.
#[derive(Debug, Clone)]
pub struct HeaderCacheDetector {
    name: HeaderName,
    value: HeaderValue,
}

impl HeaderCacheDetector {
    /// The header set by common HTTP caching transports on responses served from the cache.
    pub const FROM_CACHE: &'static str = "x-from-cache";

    #[must_use]
    pub const fn new(name: HeaderName, value: HeaderValue) -> Self {
        Self { name, value }
    }
}

impl Default for HeaderCacheDetector {
    fn default() -> Self {
        Self::new(
            HeaderName::from_static(Self::FROM_CACHE),
            HeaderValue::from_static("1"),
        )
    }
}

impl CacheDetector for HeaderCacheDetector {
    fn is_cached(&self, response: &HttpResponse) -> bool {
        response.headers.get(&self.name) == Some(&self.value)
    }
}

/// An `HttpClient` backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Create a `ReqwestClient` with the default `reqwest` configuration.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|err| Error::Transport(Box::new(err)))?;
        Ok(Self { client })
    }

    /// Create a `ReqwestClient` from a preconfigured `reqwest` client.
    #[must_use]
    pub const fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl HttpClient for ReqwestClient {
    #[instrument(skip_all, fields(url = %request.url), level = "trace")]
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let response = self
            .client
            .get(request.url.clone())
            .headers(request.headers.clone())
            .timeout(request.timeout)
            .send()
            .map_err(|err| Error::Transport(Box::new(err)))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .map_err(|err| Error::Transport(Box::new(err)))?
            .to_vec();
        tracing::trace!(%status, len = body.len());
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
