//! Provider error envelope.
//!
//! The provider reports failures in several shapes depending on which layer
//! rejected the request:
//!
//! - payment API: a JSON array of `{errorGroup, errorCode, errorMessage, contextId}`
//! - some payment API errors: a single such object
//! - token endpoint: `{error, error_description}`
//! - API gateway (bad subscription key, throttling): `{statusCode, message}`
//!
//! [`parse_error_envelope`] normalizes all of them into [`ErrorEntry`] values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One provider-reported error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEntry {
    /// Coarse category, e.g. `"Payment"` or `"Authentication"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_group: Option<String>,

    /// Machine-readable code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Provider correlation id for support requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
}

const ENTRY_KEYS: [&str; 3] = ["errorCode", "errorMessage", "errorGroup"];

/// Recognizes an error-shaped payload.
///
/// Returns `None` if `value` does not look like any known error envelope,
/// which is the case for every successful response body.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use vipps_proto::parse_error_envelope;
///
/// let errors = parse_error_envelope(&json!([{
///     "errorGroup": "Payment",
///     "errorCode": "42",
///     "errorMessage": "Refused by issuer bank",
///     "contextId": "ab9c7b3f"
/// }]))
/// .unwrap();
/// assert_eq!(errors[0].error_code.as_deref(), Some("42"));
/// assert!(parse_error_envelope(&json!({ "orderId": "o-1" })).is_none());
/// ```
#[must_use]
pub fn parse_error_envelope(value: &Value) -> Option<Vec<ErrorEntry>> {
    match value {
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .map(|item| item.as_object().and_then(entry_from_object))
            .collect(),
        Value::Object(object) => entry_from_object(object).map(|entry| vec![entry]),
        _ => None,
    }
}

fn entry_from_object(object: &Map<String, Value>) -> Option<ErrorEntry> {
    if ENTRY_KEYS.iter().any(|key| object.contains_key(*key)) {
        return Some(ErrorEntry {
            error_group: text(object.get("errorGroup")),
            error_code: text(object.get("errorCode")),
            error_message: text(object.get("errorMessage")),
            context_id: text(object.get("contextId")),
        });
    }
    if let Some(code) = object.get("error").and_then(Value::as_str) {
        return Some(ErrorEntry {
            error_group: Some("Authentication".to_owned()),
            error_code: Some(code.to_owned()),
            error_message: text(object.get("error_description")),
            context_id: text(object.get("correlation_id")),
        });
    }
    if object.contains_key("statusCode") && object.contains_key("message") {
        return Some(ErrorEntry {
            error_group: None,
            error_code: text(object.get("statusCode")),
            error_message: text(object.get("message")),
            context_id: None,
        });
    }
    None
}

/// Renders strings and numbers as text; anything else is dropped.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_error_array() {
        let errors = parse_error_envelope(&json!([
            {
                "errorGroup": "Merchant",
                "errorCode": "35",
                "errorMessage": "Requested Order not found",
                "contextId": "ctx-1"
            },
            { "errorCode": 81, "errorMessage": "User not registered" }
        ]))
        .unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].error_group.as_deref(), Some("Merchant"));
        assert_eq!(errors[0].context_id.as_deref(), Some("ctx-1"));
        assert_eq!(errors[1].error_code.as_deref(), Some("81"));
        assert_eq!(errors[1].error_group, None);
    }

    #[test]
    fn test_single_error_object() {
        let errors =
            parse_error_envelope(&json!({ "errorCode": "ERR", "errorMessage": "boom" })).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_message.as_deref(), Some("boom"));
    }

    #[test]
    fn test_token_endpoint_error() {
        let errors = parse_error_envelope(&json!({
            "error": "unauthorized_client",
            "error_description": "AADSTS70001: Application is disabled.",
            "correlation_id": "corr-1"
        }))
        .unwrap();
        assert_eq!(errors[0].error_code.as_deref(), Some("unauthorized_client"));
        assert_eq!(errors[0].error_group.as_deref(), Some("Authentication"));
        assert_eq!(errors[0].context_id.as_deref(), Some("corr-1"));
    }

    #[test]
    fn test_gateway_error() {
        let errors = parse_error_envelope(&json!({
            "statusCode": 401,
            "message": "Access denied due to invalid subscription key."
        }))
        .unwrap();
        assert_eq!(errors[0].error_code.as_deref(), Some("401"));
    }

    #[test]
    fn test_success_shapes_are_not_errors() {
        assert!(parse_error_envelope(&json!({ "orderId": "o-1", "url": "u" })).is_none());
        assert!(parse_error_envelope(&json!({})).is_none());
        assert!(parse_error_envelope(&json!([])).is_none());
        assert!(parse_error_envelope(&json!([{ "orderId": "o-1" }])).is_none());
        assert!(parse_error_envelope(&json!("error")).is_none());
    }
}
