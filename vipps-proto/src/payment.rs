//! Payment Models and the response envelope of each payment operation.
//!
//! Every field maps one-to-one to a camelCase JSON key. Absent keys and
//! explicit `null`s fall back to an empty value (`""`, `0`, `false`, `None`,
//! empty `Vec`) instead of failing the parse; nested objects that may be
//! missing altogether are `Option`s. The only key whose absence is an error is `orderId` on the
//! response envelopes.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};
use time::OffsetDateTime;

use crate::timestamp;

/// Postal address attached to shipping details.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    /// First address line.
    #[serde_as(as = "DefaultOnNull")]
    pub address_line1: String,
    /// Second address line.
    #[serde_as(as = "DefaultOnNull")]
    pub address_line2: String,
    /// City.
    #[serde_as(as = "DefaultOnNull")]
    pub city: String,
    /// Country.
    #[serde_as(as = "DefaultOnNull")]
    pub country: String,
    /// Postal code, kept as text to preserve leading zeros.
    #[serde_as(as = "DefaultOnNull")]
    pub post_code: String,
}

/// Running totals of a payment, in minor currency units.
#[serde_as]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionSummary {
    /// Amount captured so far.
    #[serde_as(as = "DefaultOnNull")]
    pub captured_amount: u64,
    /// Reserved amount still available for capture.
    #[serde_as(as = "DefaultOnNull")]
    pub remaining_amount_to_capture: u64,
    /// Amount refunded so far.
    #[serde_as(as = "DefaultOnNull")]
    pub refunded_amount: u64,
    /// Captured amount still available for refund.
    #[serde_as(as = "DefaultOnNull")]
    pub remaining_amount_to_refund: u64,
}

/// Outcome of the operation that produced the response.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionInfo {
    /// Amount in minor currency units.
    #[serde_as(as = "DefaultOnNull")]
    pub amount: u64,
    /// Provider status string, e.g. `"Captured"`.
    #[serde_as(as = "DefaultOnNull")]
    pub status: String,
    /// Time of the transaction, second precision.
    #[serde(with = "timestamp::lenient", skip_serializing_if = "Option::is_none")]
    pub time_stamp: Option<OffsetDateTime>,
    /// Provider transaction identifier.
    #[serde_as(as = "DefaultOnNull")]
    pub transaction_id: String,
    /// Free text shown to the user.
    #[serde_as(as = "DefaultOnNull")]
    pub transaction_text: String,
}

/// Kind of a [`TransactionLog`] entry.
///
/// Operations the client does not know about are kept verbatim in
/// [`TransactionOperation::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionOperation {
    /// Payment initiated.
    Initiate,
    /// Amount reserved on the user's card.
    Reserve,
    /// Reserved amount captured.
    Capture,
    /// Reservation cancelled.
    Cancel,
    /// Captured amount refunded.
    Refund,
    /// Reserve and capture in one step.
    Sale,
    /// Reservation voided.
    Void,
    /// Any operation not listed above.
    #[serde(untagged)]
    Other(String),
}

impl TransactionOperation {
    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Initiate => "INITIATE",
            Self::Reserve => "RESERVE",
            Self::Capture => "CAPTURE",
            Self::Cancel => "CANCEL",
            Self::Refund => "REFUND",
            Self::Sale => "SALE",
            Self::Void => "VOID",
            Self::Other(other) => other,
        }
    }
}

impl Display for TransactionOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a payment's `transactionLogHistory`.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionLog {
    /// Amount in minor currency units.
    #[serde_as(as = "DefaultOnNull")]
    pub amount: u64,
    /// What happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<TransactionOperation>,
    /// Whether the operation succeeded.
    #[serde_as(as = "DefaultOnNull")]
    pub operation_success: bool,
    /// Request identifier supplied with the operation.
    #[serde_as(as = "DefaultOnNull")]
    pub request_id: String,
    /// When it happened, second precision.
    #[serde(with = "timestamp::lenient", skip_serializing_if = "Option::is_none")]
    pub time_stamp: Option<OffsetDateTime>,
    /// Provider transaction identifier.
    #[serde_as(as = "DefaultOnNull")]
    pub transaction_id: String,
    /// Free text supplied with the operation.
    #[serde_as(as = "DefaultOnNull")]
    pub transaction_text: String,
}

/// Details about the user who approved the payment.
///
/// `date_of_birth` is passed through as the provider formats it; it is not
/// a parsed date.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDetails {
    /// `"Y"` or `"N"`.
    #[serde_as(as = "DefaultOnNull")]
    pub bank_id_verified: String,
    /// Raw date of birth.
    #[serde_as(as = "DefaultOnNull")]
    pub date_of_birth: String,
    /// Email address.
    #[serde_as(as = "DefaultOnNull")]
    pub email: String,
    /// First name.
    #[serde_as(as = "DefaultOnNull")]
    pub first_name: String,
    /// Last name.
    #[serde_as(as = "DefaultOnNull")]
    pub last_name: String,
    /// Mobile number.
    #[serde_as(as = "DefaultOnNull")]
    pub mobile_number: String,
    /// National identity number.
    #[serde_as(as = "DefaultOnNull")]
    pub ssn: String,
    /// Provider user identifier.
    #[serde_as(as = "DefaultOnNull")]
    pub user_id: String,
}

/// Shipping choice made by the user in express checkout.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentShippingDetails {
    /// Delivery address, when one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Shipping cost in minor currency units.
    #[serde_as(as = "DefaultOnNull")]
    pub shipping_cost: u64,
    /// Human-readable shipping method.
    #[serde_as(as = "DefaultOnNull")]
    pub shipping_method: String,
    /// Merchant-defined shipping method identifier.
    #[serde_as(as = "DefaultOnNull")]
    pub shipping_method_id: String,
}

/// Response of `POST /ecomm/v2/payments`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiatePaymentResponse {
    /// Merchant order identifier.
    pub order_id: String,
    /// Landing page or deep link the user is redirected to.
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub url: String,
}

/// Response shared by capture, cancel and refund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Merchant order identifier.
    pub order_id: String,
    /// Totals after the operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_summary: Option<TransactionSummary>,
    /// Outcome of the operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_info: Option<TransactionInfo>,
}

/// Response of `POST /ecomm/v2/payments/{orderId}/capture`.
pub type CapturePaymentResponse = TransactionResponse;

/// Response of `PUT /ecomm/v2/payments/{orderId}/cancel`.
pub type CancelPaymentResponse = TransactionResponse;

/// Response of `POST /ecomm/v2/payments/{orderId}/refund`.
pub type RefundPaymentResponse = TransactionResponse;

/// Response of `GET /ecomm/v2/payments/{orderId}/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusResponse {
    /// Merchant order identifier.
    pub order_id: String,
    /// Latest transaction state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_info: Option<TransactionInfo>,
}

/// Response of `GET /ecomm/v2/payments/{orderId}/details`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailsResponse {
    /// Merchant order identifier.
    pub order_id: String,
    /// Shipping choice, only present for express checkout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_details: Option<PaymentShippingDetails>,
    /// Every operation performed on the payment, oldest first.
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub transaction_log_history: Vec<TransactionLog>,
    /// Current totals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_summary: Option<TransactionSummary>,
    /// The paying user, when shared with the merchant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_details: Option<UserDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    fn details_payload() -> serde_json::Value {
        json!({
            "orderId": "test_order_id",
            "shippingDetails": {
                "address": {
                    "addressLine1": "Dronning Eufemias gate 42",
                    "addressLine2": "Att: Rune Garborg",
                    "city": "Oslo",
                    "country": "Norway",
                    "postCode": "0191"
                },
                "shippingCost": 1500,
                "shippingMethod": "Posten",
                "shippingMethodId": "string"
            },
            "transactionLogHistory": [
                {
                    "amount": 1200,
                    "operation": "RESERVE",
                    "operationSuccess": true,
                    "requestId": "test_request_id",
                    "timeStamp": "2017-07-31T15:07:37.0Z",
                    "transactionId": "test_transaction_id",
                    "transactionText": "test_transaction_text"
                },
                {
                    "amount": 1200,
                    "operation": "CAPTURE",
                    "operationSuccess": false,
                    "timeStamp": "2017-07-31T15:09:02.512Z"
                }
            ],
            "transactionSummary": {
                "capturedAmount": 10,
                "refundedAmount": 12,
                "remainingAmountToCapture": 11,
                "remainingAmountToRefund": 13
            },
            "userDetails": {
                "bankIdVerified": "Y",
                "dateOfBirth": "12-3-1988",
                "email": "user@example.com",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "mobileNumber": "12345678",
                "ssn": "12345678901",
                "userId": "uiJskNQ6qNN1iwN891uuob=="
            }
        })
    }

    #[test]
    fn test_payment_details_full_payload() {
        let details: PaymentDetailsResponse = serde_json::from_value(details_payload()).unwrap();
        assert_eq!(details.order_id, "test_order_id");

        let shipping = details.shipping_details.as_ref().unwrap();
        let address = shipping.address.as_ref().unwrap();
        assert_eq!(address.address_line1, "Dronning Eufemias gate 42");
        assert_eq!(address.address_line2, "Att: Rune Garborg");
        assert_eq!(address.city, "Oslo");
        assert_eq!(address.country, "Norway");
        assert_eq!(address.post_code, "0191");
        assert_eq!(shipping.shipping_cost, 1500);
        assert_eq!(shipping.shipping_method, "Posten");
        assert_eq!(shipping.shipping_method_id, "string");

        assert_eq!(details.transaction_log_history.len(), 2);
        let first = &details.transaction_log_history[0];
        assert_eq!(first.amount, 1200);
        assert_eq!(first.operation, Some(TransactionOperation::Reserve));
        assert!(first.operation_success);
        assert_eq!(first.request_id, "test_request_id");
        assert_eq!(first.time_stamp, Some(datetime!(2017-07-31 15:07:37 UTC)));
        assert_eq!(first.transaction_id, "test_transaction_id");
        assert_eq!(first.transaction_text, "test_transaction_text");
        let second = &details.transaction_log_history[1];
        assert_eq!(second.operation, Some(TransactionOperation::Capture));
        assert_eq!(second.request_id, "");

        let summary = details.transaction_summary.unwrap();
        assert_eq!(summary.captured_amount, 10);
        assert_eq!(summary.remaining_amount_to_capture, 11);
        assert_eq!(summary.refunded_amount, 12);
        assert_eq!(summary.remaining_amount_to_refund, 13);

        let user = details.user_details.as_ref().unwrap();
        assert_eq!(user.bank_id_verified, "Y");
        assert_eq!(user.date_of_birth, "12-3-1988");
        assert_eq!(user.email, "user@example.com");
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, "Lovelace");
        assert_eq!(user.mobile_number, "12345678");
        assert_eq!(user.ssn, "12345678901");
        assert_eq!(user.user_id, "uiJskNQ6qNN1iwN891uuob==");
    }

    #[test]
    fn test_payment_details_survives_reencoding() {
        let details: PaymentDetailsResponse = serde_json::from_value(details_payload()).unwrap();
        let encoded = serde_json::to_value(&details).unwrap();
        let decoded: PaymentDetailsResponse = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, details);
    }

    #[test]
    fn test_payment_details_without_nested_objects() {
        let details: PaymentDetailsResponse =
            serde_json::from_value(json!({ "orderId": "o-1" })).unwrap();
        assert_eq!(details.order_id, "o-1");
        assert!(details.shipping_details.is_none());
        assert!(details.transaction_log_history.is_empty());
        assert!(details.transaction_summary.is_none());
        assert!(details.user_details.is_none());
    }

    #[test]
    fn test_shipping_details_without_address() {
        let shipping: PaymentShippingDetails =
            serde_json::from_value(json!({ "shippingCost": 0, "shippingMethod": "Pickup" }))
                .unwrap();
        assert!(shipping.address.is_none());
        assert_eq!(shipping.shipping_method, "Pickup");
        assert_eq!(shipping.shipping_method_id, "");
    }

    #[test]
    fn test_missing_order_id_is_rejected() {
        let result: Result<OrderStatusResponse, _> =
            serde_json::from_value(json!({ "transactionInfo": { "amount": 1 } }));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_timestamp_does_not_fail() {
        let status: OrderStatusResponse = serde_json::from_value(json!({
            "orderId": "o-1",
            "transactionInfo": { "amount": 1200, "timeStamp": "soon", "status": "RESERVE" }
        }))
        .unwrap();
        let info = status.transaction_info.unwrap();
        assert_eq!(info.amount, 1200);
        assert_eq!(info.time_stamp, None);
        assert_eq!(info.status, "RESERVE");
    }

    #[test]
    fn test_unknown_operation_is_kept() {
        let log: TransactionLog =
            serde_json::from_value(json!({ "operation": "REFUND_PARTIAL" })).unwrap();
        assert_eq!(
            log.operation,
            Some(TransactionOperation::Other("REFUND_PARTIAL".to_owned()))
        );
        assert_eq!(log.operation.unwrap().as_str(), "REFUND_PARTIAL");
    }

    #[test]
    fn test_transaction_response_capture_payload() {
        let response: CapturePaymentResponse = serde_json::from_value(json!({
            "orderId": "test_order_id",
            "transactionSummary": {
                "capturedAmount": 10,
                "remainingAmountToCapture": 11,
                "refundedAmount": 12,
                "remainingAmountToRefund": 13
            },
            "transactionInfo": {
                "amount": 1200,
                "timeStamp": "2017-07-31T15:07:37.100Z",
                "status": "test_status",
                "transactionId": "test_transaction_id",
                "transactionText": "test_transaction_text"
            }
        }))
        .unwrap();
        let info = response.transaction_info.unwrap();
        assert_eq!(info.time_stamp, Some(datetime!(2017-07-31 15:07:37 UTC)));
        assert_eq!(info.status, "test_status");
        assert_eq!(response.transaction_summary.unwrap().refunded_amount, 12);
    }

    #[test]
    fn test_null_leaf_values_become_defaults() {
        let details: PaymentDetailsResponse = serde_json::from_value(json!({
            "orderId": "test_order_id",
            "shippingDetails": {
                "address": { "addressLine1": "Storgata 1", "addressLine2": null },
                "shippingCost": null,
                "shippingMethod": null
            },
            "transactionLogHistory": [
                { "amount": null, "operation": null, "operationSuccess": null, "transactionText": null }
            ],
            "transactionSummary": { "capturedAmount": null, "refundedAmount": 12 },
            "userDetails": { "email": null, "firstName": "Ada" }
        }))
        .unwrap();

        let shipping = details.shipping_details.unwrap();
        let address = shipping.address.unwrap();
        assert_eq!(address.address_line1, "Storgata 1");
        assert_eq!(address.address_line2, "");
        assert_eq!(shipping.shipping_cost, 0);
        assert_eq!(shipping.shipping_method, "");
        assert_eq!(details.transaction_log_history, vec![TransactionLog::default()]);
        let summary = details.transaction_summary.unwrap();
        assert_eq!(summary.captured_amount, 0);
        assert_eq!(summary.refunded_amount, 12);
        let user = details.user_details.unwrap();
        assert_eq!(user.email, "");
        assert_eq!(user.first_name, "Ada");
    }

    #[test]
    fn test_null_log_history_and_transaction_text() {
        let details: PaymentDetailsResponse = serde_json::from_value(json!({
            "orderId": "test_order_id",
            "transactionLogHistory": null,
            "shippingDetails": null
        }))
        .unwrap();
        assert!(details.transaction_log_history.is_empty());
        assert!(details.shipping_details.is_none());

        let status: OrderStatusResponse = serde_json::from_value(json!({
            "orderId": "test_order_id",
            "transactionInfo": { "amount": 1200, "status": null, "transactionText": null }
        }))
        .unwrap();
        let info = status.transaction_info.unwrap();
        assert_eq!(info.amount, 1200);
        assert_eq!(info.status, "");
        assert_eq!(info.transaction_text, "");

        let initiated: InitiatePaymentResponse =
            serde_json::from_value(json!({ "orderId": "o", "url": null })).unwrap();
        assert_eq!(initiated.url, "");
    }
}
