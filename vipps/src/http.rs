//! HTTP method, request/response tuples and the transport contract.
//!
//! The client never talks to the network directly. A [`Resource`](crate::resource::Resource)
//! describes an [`HttpRequest`]; a [`Transport`] turns it into an
//! [`HttpResponse`]. [`ReqwestTransport`] is the stock implementation, built
//! on `reqwest-middleware` so retries, tracing or other interceptors can be
//! layered in without touching this crate.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use http::{HeaderMap, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde_json::Value;
use url::Url;

use crate::error::TransportError;

/// HTTP verbs used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
}

impl HttpMethod {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
        }
    }
}

/// Request headers, ordered by name so a request renders deterministically.
pub type Headers = BTreeMap<String, String>;

/// A fully described request, relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute path, e.g. `/ecomm/v2/payments`.
    pub path: String,
    /// Header name/value pairs.
    pub headers: Headers,
    /// JSON body, if any.
    pub body: Option<Value>,
}

/// A raw response as returned by the transport.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Undecoded body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response without headers.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Creates a response carrying `value` as its JSON body.
    #[must_use]
    pub fn json(status: StatusCode, value: &Value) -> Self {
        Self::new(status, value.to_string())
    }
}

/// Sends requests on behalf of the client.
///
/// Implementations own connection handling, TLS, retries and timeouts. They
/// must report a timeout as [`TransportError::Timeout`] so callers can tell it
/// apart from other failures.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns whatever response the server produced,
    /// whatever its status code.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`Transport`] backed by a `reqwest` client with middleware.
#[derive(Clone)]
pub struct ReqwestTransport {
    base_url: Url,
    client: ClientWithMiddleware,
    timeout: Option<Duration>,
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    /// Creates a transport with a plain `reqwest` client and no middleware.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self::with_client(base_url, ClientBuilder::new(reqwest::Client::new()).build())
    }

    /// Creates a transport around a pre-built middleware client.
    #[must_use]
    pub const fn with_client(base_url: Url, client: ClientWithMiddleware) -> Self {
        Self {
            base_url,
            client,
            timeout: None,
        }
    }

    /// Sets a timeout for every request.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the configured timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Resolves `path` against the base URL, keeping any base path prefix.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Url`] if the result is not a valid URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        let mut raw = self.base_url.as_str().trim_end_matches('/').to_owned();
        raw.push_str(path);
        Ok(Url::parse(&raw)?)
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.endpoint(&request.path)?;
        let mut builder = self.client.request(request.method.into(), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body).map_err(TransportError::Body)?);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
