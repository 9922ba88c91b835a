//! Payment lifecycle operations under `/ecomm/v2/payments`.

use vipps_proto::{
    CancelPaymentResponse, CapturePaymentResponse, InitiatePaymentRequest, InitiatePaymentResponse,
    InitiateTransaction, MerchantInfo, OperationRequest, OperationTransaction,
    OrderStatusResponse, PaymentDetailsResponse, RefundPaymentResponse,
};

use super::{Resource, Session};
use crate::constants::PAYMENTS_PATH;
use crate::error::Error;
use crate::http::{Headers, HttpMethod};
use crate::options::InitiatePaymentOptions;

/// Checks that `order_id` can be placed in a request path as one segment.
///
/// Order ids are limited to ASCII letters, digits, `-`, `_` and `.`. The
/// dot segments `.` and `..` are rejected since URL resolution would collapse
/// them.
///
/// # Errors
///
/// Returns [`Error::InvalidOrderId`] if the id is empty, contains any other
/// character, or is a dot segment.
pub fn validate_order_id(order_id: &str) -> Result<(), Error> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');
    if order_id.is_empty() || matches!(order_id, "." | "..") || !order_id.chars().all(allowed) {
        return Err(Error::InvalidOrderId(order_id.to_owned()));
    }
    Ok(())
}

fn order_path(order_id: &str, action: &str) -> String {
    format!("{PAYMENTS_PATH}/{order_id}/{action}")
}

fn operation(session: &Session, transaction_text: String, amount: Option<u64>) -> OperationRequest {
    OperationRequest {
        merchant_info: MerchantInfo::new(session.merchant_serial_number()),
        transaction: OperationTransaction {
            amount,
            transaction_text,
        },
    }
}

/// `POST /ecomm/v2/payments`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatePayment {
    session: Session,
    request: InitiatePaymentRequest,
}

impl InitiatePayment {
    /// Creates a payment initiation.
    ///
    /// `callback_prefix` is where the provider posts status callbacks,
    /// `fall_back` is where the user lands once the payment flow ends.
    #[must_use]
    pub fn new(
        session: Session,
        order_id: impl Into<String>,
        amount: u64,
        transaction_text: impl Into<String>,
        callback_prefix: impl Into<String>,
        fall_back: impl Into<String>,
        options: InitiatePaymentOptions,
    ) -> Self {
        let mut merchant_info = MerchantInfo::new(session.merchant_serial_number());
        merchant_info.callback_prefix = Some(callback_prefix.into());
        merchant_info.fall_back = Some(fall_back.into());

        let mut request = InitiatePaymentRequest {
            customer_info: None,
            merchant_info,
            transaction: InitiateTransaction {
                order_id: order_id.into(),
                amount,
                transaction_text: transaction_text.into(),
                time_stamp: None,
                ref_order_id: None,
            },
            extra: serde_json::Map::new(),
        };
        options.apply(&mut request);

        Self { session, request }
    }

    /// The body that will be sent.
    #[must_use]
    pub const fn payload(&self) -> &InitiatePaymentRequest {
        &self.request
    }
}

impl Resource for InitiatePayment {
    type Body = InitiatePaymentRequest;
    type Output = InitiatePaymentResponse;

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn path(&self) -> String {
        PAYMENTS_PATH.to_owned()
    }

    fn headers(&self) -> Headers {
        self.session.headers()
    }

    fn body(&self) -> Option<&InitiatePaymentRequest> {
        Some(&self.request)
    }

    fn validate(&self) -> Result<(), Error> {
        validate_order_id(&self.request.transaction.order_id)
    }
}

/// `POST /ecomm/v2/payments/{orderId}/capture`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturePayment {
    session: Session,
    order_id: String,
    request: OperationRequest,
}

impl CapturePayment {
    /// Captures `amount` of a reserved payment.
    #[must_use]
    pub fn new(
        session: Session,
        order_id: impl Into<String>,
        transaction_text: impl Into<String>,
        amount: u64,
    ) -> Self {
        let request = operation(&session, transaction_text.into(), Some(amount));
        Self {
            session,
            order_id: order_id.into(),
            request,
        }
    }
}

impl Resource for CapturePayment {
    type Body = OperationRequest;
    type Output = CapturePaymentResponse;

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn path(&self) -> String {
        order_path(&self.order_id, "capture")
    }

    fn headers(&self) -> Headers {
        self.session.headers()
    }

    fn body(&self) -> Option<&OperationRequest> {
        Some(&self.request)
    }

    fn validate(&self) -> Result<(), Error> {
        validate_order_id(&self.order_id)
    }
}

/// `PUT /ecomm/v2/payments/{orderId}/cancel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelPayment {
    session: Session,
    order_id: String,
    request: OperationRequest,
}

impl CancelPayment {
    /// Cancels a payment that has not been captured.
    #[must_use]
    pub fn new(
        session: Session,
        order_id: impl Into<String>,
        transaction_text: impl Into<String>,
    ) -> Self {
        let request = operation(&session, transaction_text.into(), None);
        Self {
            session,
            order_id: order_id.into(),
            request,
        }
    }
}

impl Resource for CancelPayment {
    type Body = OperationRequest;
    type Output = CancelPaymentResponse;

    fn method(&self) -> HttpMethod {
        HttpMethod::Put
    }

    fn path(&self) -> String {
        order_path(&self.order_id, "cancel")
    }

    fn headers(&self) -> Headers {
        self.session.headers()
    }

    fn body(&self) -> Option<&OperationRequest> {
        Some(&self.request)
    }

    fn validate(&self) -> Result<(), Error> {
        validate_order_id(&self.order_id)
    }
}

/// `POST /ecomm/v2/payments/{orderId}/refund`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundPayment {
    session: Session,
    order_id: String,
    request: OperationRequest,
}

impl RefundPayment {
    /// Refunds `amount` of a captured payment.
    #[must_use]
    pub fn new(
        session: Session,
        order_id: impl Into<String>,
        transaction_text: impl Into<String>,
        amount: u64,
    ) -> Self {
        let request = operation(&session, transaction_text.into(), Some(amount));
        Self {
            session,
            order_id: order_id.into(),
            request,
        }
    }
}

impl Resource for RefundPayment {
    type Body = OperationRequest;
    type Output = RefundPaymentResponse;

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn path(&self) -> String {
        order_path(&self.order_id, "refund")
    }

    fn headers(&self) -> Headers {
        self.session.headers()
    }

    fn body(&self) -> Option<&OperationRequest> {
        Some(&self.request)
    }

    fn validate(&self) -> Result<(), Error> {
        validate_order_id(&self.order_id)
    }
}

/// `GET /ecomm/v2/payments/{orderId}/status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetOrderStatus {
    session: Session,
    order_id: String,
}

impl GetOrderStatus {
    /// Looks up the current status of an order.
    #[must_use]
    pub fn new(session: Session, order_id: impl Into<String>) -> Self {
        Self {
            session,
            order_id: order_id.into(),
        }
    }
}

impl Resource for GetOrderStatus {
    type Body = ();
    type Output = OrderStatusResponse;

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn path(&self) -> String {
        order_path(&self.order_id, "status")
    }

    fn headers(&self) -> Headers {
        self.session.headers()
    }

    fn body(&self) -> Option<&()> {
        None
    }

    fn validate(&self) -> Result<(), Error> {
        validate_order_id(&self.order_id)
    }
}

/// `GET /ecomm/v2/payments/{orderId}/details`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPaymentDetails {
    session: Session,
    order_id: String,
}

impl GetPaymentDetails {
    /// Looks up the full transaction history of an order.
    #[must_use]
    pub fn new(session: Session, order_id: impl Into<String>) -> Self {
        Self {
            session,
            order_id: order_id.into(),
        }
    }
}

impl Resource for GetPaymentDetails {
    type Body = ();
    type Output = PaymentDetailsResponse;

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn path(&self) -> String {
        order_path(&self.order_id, "details")
    }

    fn headers(&self) -> Headers {
        self.session.headers()
    }

    fn body(&self) -> Option<&()> {
        None
    }

    fn validate(&self) -> Result<(), Error> {
        validate_order_id(&self.order_id)
    }
}
