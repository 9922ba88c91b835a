//! Wire format types for the Vipps eCommerce payment API.
//!
//! This crate holds the serialization-level data structures exchanged with
//! the provider: response Models, request bodies and the error envelope.
//! It depends only on `serde`, `serde_json`, `serde_with` and `time`, and is
//! shared by the client crate and anything that wants to inspect raw payloads.
//!
//! # Modules
//!
//! - [`authorization`] — Access token response
//! - [`payment`] — Payment Models and response envelopes
//! - [`request`] — Request bodies for the payment operations
//! - [`error`] — Provider error envelope
//! - [`timestamp`] — Lenient ISO-8601 timestamp handling

pub mod authorization;
pub mod error;
pub mod payment;
pub mod request;
pub mod timestamp;

pub use authorization::AccessTokenResponse;
pub use error::{ErrorEntry, parse_error_envelope};
pub use payment::{
    Address, CancelPaymentResponse, CapturePaymentResponse, InitiatePaymentResponse,
    OrderStatusResponse, PaymentDetailsResponse, PaymentShippingDetails, RefundPaymentResponse,
    TransactionInfo, TransactionLog, TransactionOperation, TransactionResponse,
    TransactionSummary, UserDetails,
};
pub use request::{
    CancelPaymentRequest, CapturePaymentRequest, CustomerInfo, InitiatePaymentRequest,
    InitiateTransaction, MerchantInfo, OperationRequest, OperationTransaction,
    RefundPaymentRequest,
};
