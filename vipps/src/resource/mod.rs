//! Request/response mapping, one [`Resource`] per remote operation.
//!
//! A Resource is built per call from the operation's arguments and fixes the
//! method, path, headers and body of the request. [`execute`] sends it
//! through a [`Transport`] and maps the raw response:
//!
//! 1. non-2xx status → [`ProviderError`], whatever the body
//! 2. 2xx with a body that is not JSON → [`ParseError::Malformed`]
//! 3. 2xx with an error-shaped JSON body → [`ProviderError`]
//! 4. 2xx JSON that does not fit the Model → [`ParseError::Mismatch`]
//!
//! Resources never log, retry or cache anything themselves.

pub mod authorization;
pub mod payment;

pub use authorization::GetToken;
pub use payment::{
    CancelPayment, CapturePayment, GetOrderStatus, GetPaymentDetails, InitiatePayment,
    RefundPayment, validate_order_id,
};

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
#[cfg(feature = "telemetry")]
use tracing::instrument;
use vipps_proto::parse_error_envelope;

use crate::constants::{
    AUTHORIZATION_HEADER, CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE, MERCHANT_SERIAL_NUMBER_HEADER,
    SUBSCRIPTION_KEY_HEADER,
};
use crate::error::{Error, ParseError, ProviderError};
use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse, Transport};

/// A single API operation.
pub trait Resource {
    /// Request body type. Use `()` for operations without a body.
    type Body: Serialize;

    /// Model the response parses into.
    type Output: DeserializeOwned;

    /// HTTP method of the operation.
    fn method(&self) -> HttpMethod;

    /// Request path, including any order id.
    fn path(&self) -> String;

    /// Headers the operation requires.
    fn headers(&self) -> Headers;

    /// Request body, if the operation sends one.
    fn body(&self) -> Option<&Self::Body>;

    /// Checks caller-supplied values before the request is assembled.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first rejected value.
    fn validate(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Assembles the full request.
    ///
    /// A JSON `Content-Type` header is added whenever a body is present.
    ///
    /// # Errors
    ///
    /// Returns whatever [`validate`](Self::validate) rejects, or
    /// [`Error::Encode`] if the body cannot be serialized.
    fn request(&self) -> Result<HttpRequest, Error> {
        self.validate()?;
        let body = self
            .body()
            .map(serde_json::to_value)
            .transpose()
            .map_err(Error::Encode)?;
        let mut headers = self.headers();
        if body.is_some() {
            headers
                .entry(CONTENT_TYPE_HEADER.to_owned())
                .or_insert_with(|| JSON_CONTENT_TYPE.to_owned());
        }
        Ok(HttpRequest {
            method: self.method(),
            path: self.path(),
            headers,
            body,
        })
    }

    /// Maps a raw response onto [`Self::Output`].
    ///
    /// # Errors
    ///
    /// See the [module documentation](self) for how failures are classified.
    fn parse(&self, response: &HttpResponse) -> Result<Self::Output, Error> {
        parse_response(response)
    }
}

/// Classifies `response` and deserializes it into `T` on success.
///
/// # Errors
///
/// Returns [`Error::Provider`] for non-2xx or error-shaped responses and
/// [`Error::Parse`] for successful responses that do not fit `T`.
pub fn parse_response<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, Error> {
    if !response.status.is_success() {
        return Err(ProviderError::from_body(response.status, &response.body).into());
    }

    let value: Value = serde_json::from_slice(&response.body).map_err(ParseError::Malformed)?;
    if let Some(errors) = parse_error_envelope(&value) {
        let body = String::from_utf8_lossy(&response.body).into_owned();
        return Err(ProviderError::new(response.status, errors, body).into());
    }

    Ok(serde_json::from_value(value).map_err(ParseError::Mismatch)?)
}

/// Sends `resource` through `transport` and parses the response.
///
/// # Errors
///
/// Returns [`Error::Transport`] if no response was received, otherwise
/// whatever [`Resource::parse`] returns.
#[cfg_attr(
    feature = "telemetry",
    instrument(
        name = "vipps.request",
        skip_all,
        fields(method = %resource.method(), path = %resource.path()),
        err
    )
)]
pub async fn execute<R>(resource: &R, transport: &dyn Transport) -> Result<R::Output, Error>
where
    R: Resource + Sync + ?Sized,
{
    let request = resource.request()?;
    let response = transport.send(request).await?;

    #[cfg(feature = "telemetry")]
    tracing::debug!(status = response.status.as_u16(), "Received response");

    resource.parse(&response)
}

/// Authentication context of one payment call.
///
/// Built by the client root from its credentials and a fresh access token.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    subscription_key: String,
    merchant_serial_number: String,
    access_token: String,
}

impl Session {
    /// Creates a new session.
    #[must_use]
    pub fn new(
        subscription_key: impl Into<String>,
        merchant_serial_number: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            subscription_key: subscription_key.into(),
            merchant_serial_number: merchant_serial_number.into(),
            access_token: access_token.into(),
        }
    }

    /// Merchant serial number the session acts for.
    #[must_use]
    pub fn merchant_serial_number(&self) -> &str {
        &self.merchant_serial_number
    }

    /// Headers shared by every authorized request.
    #[must_use]
    pub fn headers(&self) -> Headers {
        Headers::from([
            (
                AUTHORIZATION_HEADER.to_owned(),
                format!("Bearer {}", self.access_token),
            ),
            (
                MERCHANT_SERIAL_NUMBER_HEADER.to_owned(),
                self.merchant_serial_number.clone(),
            ),
            (
                SUBSCRIPTION_KEY_HEADER.to_owned(),
                self.subscription_key.clone(),
            ),
        ])
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("merchant_serial_number", &self.merchant_serial_number)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Echo {
        order_id: String,
    }

    #[test]
    fn test_session_headers() {
        let headers = Session::new("key", "123456", "tok").headers();
        assert_eq!(headers["Authorization"], "Bearer tok");
        assert_eq!(headers["Merchant-Serial-Number"], "123456");
        assert_eq!(headers["Ocp-Apim-Subscription-Key"], "key");
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn test_session_debug_hides_secrets() {
        let rendered = format!("{:?}", Session::new("key", "123456", "tok"));
        assert!(!rendered.contains("tok"));
        assert!(!rendered.contains("key"));
    }

    #[test]
    fn test_parse_success() {
        let response = HttpResponse::json(StatusCode::OK, &json!({ "orderId": "o-1" }));
        let echo: Echo = parse_response(&response).unwrap();
        assert_eq!(echo.order_id, "o-1");
    }

    #[test]
    fn test_parse_non_success_is_provider_error() {
        let response = HttpResponse::json(
            StatusCode::BAD_REQUEST,
            &json!([{ "errorCode": "35", "errorMessage": "Requested Order not found" }]),
        );
        let err = parse_response::<Echo>(&response).unwrap_err();
        let provider = err.as_provider().unwrap();
        assert_eq!(provider.code(), Some("35"));
    }

    #[test]
    fn test_parse_non_success_non_json_is_provider_error() {
        let response = HttpResponse::new(StatusCode::SERVICE_UNAVAILABLE, "maintenance");
        let err = parse_response::<Echo>(&response).unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }

    #[test]
    fn test_parse_error_shaped_success_is_provider_error() {
        let response = HttpResponse::json(
            StatusCode::OK,
            &json!([{ "errorGroup": "Payment", "errorCode": "41", "errorMessage": "Declined" }]),
        );
        let err = parse_response::<Echo>(&response).unwrap_err();
        assert_eq!(err.as_provider().unwrap().message(), Some("Declined"));
    }

    #[test]
    fn test_parse_malformed_success_is_parse_error() {
        let response = HttpResponse::new(StatusCode::OK, "<html>");
        let err = parse_response::<Echo>(&response).unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::Malformed(_))));
    }

    #[test]
    fn test_parse_missing_order_id_is_parse_error() {
        let response = HttpResponse::json(StatusCode::OK, &json!({ "url": "u" }));
        let err = parse_response::<Echo>(&response).unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::Mismatch(_))));
    }
}
