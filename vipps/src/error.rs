//! Error types of the client.
//!
//! Three kinds of failure reach the caller and stay distinguishable all the
//! way up:
//!
//! - [`TransportError`]: no usable HTTP response (network, timeout, URL).
//! - [`ProviderError`]: the provider answered and reported a failure. This is
//!   the error callers are expected to branch on.
//! - [`ParseError`]: a successful response that does not fit the expected
//!   Model, i.e. a contract mismatch.
//!
//! An order id that cannot be placed in a request path is rejected up front
//! with [`Error::InvalidOrderId`], before anything is sent.
//!
//! Nothing in this crate retries or swallows any of them.

use http::StatusCode;
use serde_json::Value;
use vipps_proto::{ErrorEntry, parse_error_envelope};

/// Boxed error of a transport implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error returned by every operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced a usable HTTP response.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// The provider reported a failure.
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// A successful response could not be mapped onto its Model.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// A request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The order id cannot be used in a request path.
    #[error("invalid order id {0:?}: expected 1 or more of [A-Za-z0-9-_.], not `.` or `..`")]
    InvalidOrderId(String),
}

impl Error {
    /// Returns `true` if the transport gave up waiting for a response.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Timeout(_)))
    }

    /// Returns the provider error, if this is one.
    #[must_use]
    pub const fn as_provider(&self) -> Option<&ProviderError> {
        match self {
            Self::Provider(err) => Some(err),
            _ => None,
        }
    }
}

/// Failure below the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request timed out.
    #[error("request timed out: {0}")]
    Timeout(#[source] BoxError),

    /// Connection, TLS, protocol or middleware failure.
    #[error("HTTP transport failure: {0}")]
    Http(#[source] BoxError),

    /// Base URL and path did not form a valid URL.
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// The request body could not be written.
    #[error("failed to write request body: {0}")]
    Body(#[source] serde_json::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(Box::new(err))
        } else {
            Self::Http(Box::new(err))
        }
    }
}

impl From<reqwest_middleware::Error> for TransportError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(err) => Self::from(err),
            reqwest_middleware::Error::Middleware(err) => Self::Http(err.into()),
        }
    }
}

/// Failure reported by the provider.
///
/// Carries the HTTP status, the error entries recognized in the body and the
/// raw body for anything the entries do not cover.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("provider error (HTTP {}){}", .status.as_u16(), detail(.errors, .body))]
pub struct ProviderError {
    status: StatusCode,
    errors: Vec<ErrorEntry>,
    body: String,
}

impl ProviderError {
    /// Builds a provider error from a raw response body.
    ///
    /// Recognized error envelopes are parsed into [`ErrorEntry`] values; a
    /// body that is not JSON or not error-shaped leaves the entries empty.
    #[must_use]
    pub fn from_body(status: StatusCode, body: &[u8]) -> Self {
        let errors = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|value| parse_error_envelope(&value))
            .unwrap_or_default();
        Self::new(status, errors, String::from_utf8_lossy(body).into_owned())
    }

    /// Builds a provider error from already parsed parts.
    #[must_use]
    pub const fn new(status: StatusCode, errors: Vec<ErrorEntry>, body: String) -> Self {
        Self {
            status,
            errors,
            body,
        }
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Error entries reported by the provider, in order.
    #[must_use]
    pub fn errors(&self) -> &[ErrorEntry] {
        &self.errors
    }

    /// Raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Code of the first reported error.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.errors.first()?.error_code.as_deref()
    }

    /// Message of the first reported error.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.errors.first()?.error_message.as_deref()
    }

    /// Returns `true` if the provider rejected the credentials or token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }
}

/// Renders the first error entry, or the raw body when nothing was recognized.
fn detail(errors: &[ErrorEntry], body: &str) -> String {
    let first = errors.first();
    let code = first.and_then(|entry| entry.error_code.as_deref());
    let message = first.and_then(|entry| entry.error_message.as_deref());
    match (code, message) {
        (Some(code), Some(message)) => format!(": [{code}] {message}"),
        (Some(code), None) => format!(": [{code}]"),
        (None, Some(message)) => format!(": {message}"),
        (None, None) if !body.is_empty() => format!(": {body}"),
        (None, None) => String::new(),
    }
}

/// A successful response did not fit its Model.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The body is not JSON at all.
    #[error("response body is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The JSON does not match the Model, e.g. `orderId` is missing.
    #[error("response does not match the expected model: {0}")]
    Mismatch(#[source] serde_json::Error),

    /// A field needed by the client itself is missing or empty.
    #[error("response is missing required field `{0}`")]
    MissingField(&'static str),
}
