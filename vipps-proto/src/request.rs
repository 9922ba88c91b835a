//! Request bodies for the payment operations.
//!
//! Optional members are skipped when `None`: the provider treats a present
//! `null` differently from an absent key, so an unset option never reaches
//! the wire.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

/// Identifies the paying user up front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    /// Mobile number the payment request is pushed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
}

/// Merchant-side settings of a request.
///
/// Only `merchant_serial_number` is sent on every operation; the remaining
/// fields are specific to payment initiation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantInfo {
    /// Merchant serial number (MSN) of the sales unit.
    pub merchant_serial_number: String,

    /// Base URL the provider posts payment callbacks to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_prefix: Option<String>,

    /// URL the user returns to after the payment flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fall_back: Option<String>,

    /// Token echoed back in callbacks so the merchant can authenticate them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    /// Base URL for consent removal requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent_removal_prefix: Option<String>,

    /// Whether the payment is initiated from a native app.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_app: Option<bool>,

    /// `"eComm Regular Payment"` or `"eComm Express Payment"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,

    /// Base URL for express checkout shipping details callbacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_details_prefix: Option<String>,
}

impl MerchantInfo {
    /// Merchant info carrying only the serial number.
    #[must_use]
    pub fn new(merchant_serial_number: impl Into<String>) -> Self {
        Self {
            merchant_serial_number: merchant_serial_number.into(),
            ..Self::default()
        }
    }
}

/// Transaction block of a payment initiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateTransaction {
    /// Merchant order identifier.
    pub order_id: String,

    /// Amount in minor currency units.
    pub amount: u64,

    /// Free text shown to the user.
    pub transaction_text: String,

    /// Time the merchant created the order.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_stamp: Option<OffsetDateTime>,

    /// Order this payment refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_order_id: Option<String>,
}

/// Body of `POST /ecomm/v2/payments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiatePaymentRequest {
    /// Present only when something about the customer is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_info: Option<CustomerInfo>,

    /// Merchant settings.
    pub merchant_info: MerchantInfo,

    /// The transaction to initiate.
    pub transaction: InitiateTransaction,

    /// Unchecked extra members merged into the top level of the body.
    ///
    /// These are forwarded as-is and are not validated against the
    /// provider's schema. A key that collides with one of the members above
    /// replaces it.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Transaction block of capture, cancel and refund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationTransaction {
    /// Amount in minor currency units. Cancel carries none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,

    /// Free text recorded with the operation.
    pub transaction_text: String,
}

/// Body of the capture, cancel and refund operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequest {
    /// Merchant settings; only the serial number is used.
    pub merchant_info: MerchantInfo,

    /// Amount and text of the operation.
    pub transaction: OperationTransaction,
}

/// Body of `POST /ecomm/v2/payments/{orderId}/capture`.
pub type CapturePaymentRequest = OperationRequest;

/// Body of `PUT /ecomm/v2/payments/{orderId}/cancel`.
pub type CancelPaymentRequest = OperationRequest;

/// Body of `POST /ecomm/v2/payments/{orderId}/refund`.
pub type RefundPaymentRequest = OperationRequest;
