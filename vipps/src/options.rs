//! Optional parameters of payment initiation.
//!
//! [`InitiatePaymentOptions`] enumerates every option the client knows how to
//! place in the request body. Anything else goes into
//! [`InitiatePaymentOptions::extra`] and is forwarded verbatim at the top
//! level of the body, unchecked against the provider's schema.

use serde_json::{Map, Value};
use time::OffsetDateTime;
use vipps_proto::timestamp::parse_timestamp;
use vipps_proto::{CustomerInfo, InitiatePaymentRequest};

/// Optional parameters of [`Payment::initiate_payment`](crate::Payment::initiate_payment).
///
/// | Option                    | Body member                            |
/// |---------------------------|----------------------------------------|
/// | `mobile_number`           | `customerInfo.mobileNumber`            |
/// | `auth_token`              | `merchantInfo.authToken`               |
/// | `consent_removal_prefix`  | `merchantInfo.consentRemovalPrefix`    |
/// | `is_app`                  | `merchantInfo.isApp`                   |
/// | `payment_type`            | `merchantInfo.paymentType`             |
/// | `shipping_details_prefix` | `merchantInfo.shippingDetailsPrefix`   |
/// | `ref_order_id`            | `transaction.refOrderId`               |
/// | `time_stamp`              | `transaction.timeStamp`                |
/// | `extra`                   | top level, as-is                       |
///
/// Unset options are left out of the body entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitiatePaymentOptions {
    /// Mobile number to push the payment request to.
    pub mobile_number: Option<String>,
    /// Token the provider echoes back in callbacks.
    pub auth_token: Option<String>,
    /// Base URL for consent removal requests.
    pub consent_removal_prefix: Option<String>,
    /// Whether the payment is initiated from a native app.
    pub is_app: Option<bool>,
    /// Payment type, e.g. `"eComm Express Payment"`.
    pub payment_type: Option<String>,
    /// Base URL for shipping details callbacks.
    pub shipping_details_prefix: Option<String>,
    /// Order this payment refers to.
    pub ref_order_id: Option<String>,
    /// Time the order was created.
    pub time_stamp: Option<OffsetDateTime>,
    /// Unchecked extra members, forwarded as-is.
    pub extra: Map<String, Value>,
}

impl InitiatePaymentOptions {
    /// Builds options from a loosely typed key/value bag.
    ///
    /// Keys use the provider's camelCase names (`mobileNumber`, `authToken`,
    /// `consentRemovalPrefix`, `isApp`, `paymentType`, `shippingDetailsPrefix`,
    /// `refOrderId`, `timeStamp`). Strings and numbers are accepted for text
    /// options; `isApp` accepts booleans, `"true"`/`"false"` and `1`/`0`;
    /// `timeStamp` accepts an ISO-8601 string. A recognized key whose value
    /// cannot be interpreted, and every unrecognized key, is forwarded into
    /// [`extra`](Self::extra) unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use serde_json::json;
    /// use vipps::InitiatePaymentOptions;
    ///
    /// let bag = json!({ "mobileNumber": 91234567, "isApp": "true", "campaign": "spring" });
    /// let options = InitiatePaymentOptions::from_bag(bag.as_object().unwrap().clone());
    /// assert_eq!(options.mobile_number.as_deref(), Some("91234567"));
    /// assert_eq!(options.is_app, Some(true));
    /// assert_eq!(options.extra["campaign"], "spring");
    /// ```
    #[must_use]
    pub fn from_bag(bag: Map<String, Value>) -> Self {
        let mut options = Self::default();
        for (key, value) in bag {
            let recognized = match key.as_str() {
                "mobileNumber" => assign(&mut options.mobile_number, as_text(&value)),
                "authToken" => assign(&mut options.auth_token, as_text(&value)),
                "consentRemovalPrefix" => {
                    assign(&mut options.consent_removal_prefix, as_text(&value))
                }
                "isApp" => assign(&mut options.is_app, as_flag(&value)),
                "paymentType" => assign(&mut options.payment_type, as_text(&value)),
                "shippingDetailsPrefix" => {
                    assign(&mut options.shipping_details_prefix, as_text(&value))
                }
                "refOrderId" => assign(&mut options.ref_order_id, as_text(&value)),
                "timeStamp" => assign(
                    &mut options.time_stamp,
                    value.as_str().and_then(parse_timestamp),
                ),
                _ => false,
            };
            if !recognized {
                options.extra.insert(key, value);
            }
        }
        options
    }

    /// Sets the mobile number.
    #[must_use]
    pub fn with_mobile_number(mut self, mobile_number: impl Into<String>) -> Self {
        self.mobile_number = Some(mobile_number.into());
        self
    }

    /// Sets the callback authentication token.
    #[must_use]
    pub fn with_auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(auth_token.into());
        self
    }

    /// Sets the consent removal URL prefix.
    #[must_use]
    pub fn with_consent_removal_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.consent_removal_prefix = Some(prefix.into());
        self
    }

    /// Marks the payment as app-initiated or not.
    #[must_use]
    pub const fn with_is_app(mut self, is_app: bool) -> Self {
        self.is_app = Some(is_app);
        self
    }

    /// Sets the payment type.
    #[must_use]
    pub fn with_payment_type(mut self, payment_type: impl Into<String>) -> Self {
        self.payment_type = Some(payment_type.into());
        self
    }

    /// Sets the shipping details URL prefix.
    #[must_use]
    pub fn with_shipping_details_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.shipping_details_prefix = Some(prefix.into());
        self
    }

    /// Sets the referenced order id.
    #[must_use]
    pub fn with_ref_order_id(mut self, ref_order_id: impl Into<String>) -> Self {
        self.ref_order_id = Some(ref_order_id.into());
        self
    }

    /// Sets the order timestamp.
    #[must_use]
    pub const fn with_time_stamp(mut self, time_stamp: OffsetDateTime) -> Self {
        self.time_stamp = Some(time_stamp);
        self
    }

    /// Adds an unchecked extra member.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Writes the options into `request`.
    pub(crate) fn apply(self, request: &mut InitiatePaymentRequest) {
        if let Some(mobile_number) = self.mobile_number {
            request.customer_info = Some(CustomerInfo {
                mobile_number: Some(mobile_number),
            });
        }
        let merchant = &mut request.merchant_info;
        merchant.auth_token = self.auth_token;
        merchant.consent_removal_prefix = self.consent_removal_prefix;
        merchant.is_app = self.is_app;
        merchant.payment_type = self.payment_type;
        merchant.shipping_details_prefix = self.shipping_details_prefix;
        request.transaction.ref_order_id = self.ref_order_id;
        request.transaction.time_stamp = self.time_stamp;
        request.extra = self.extra;
    }
}

/// Stores `value` if present and reports whether it was.
fn assign<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    let recognized = value.is_some();
    if recognized {
        *slot = value;
    }
    recognized
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(s) => match s.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => match n.as_u64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        _ => None,
    }
}
