//! Payment lifecycle facade.

use vipps_proto::{
    CancelPaymentResponse, CapturePaymentResponse, InitiatePaymentResponse, OrderStatusResponse,
    PaymentDetailsResponse, RefundPaymentResponse,
};

use crate::client::Vipps;
use crate::error::Error;
use crate::options::InitiatePaymentOptions;
use crate::resource::{
    CancelPayment, CapturePayment, GetOrderStatus, GetPaymentDetails, InitiatePayment,
    RefundPayment, validate_order_id,
};

/// Operations on eCommerce payments.
///
/// Every method first checks the order id with
/// [`validate_order_id`](crate::resource::validate_order_id), then makes sure
/// the client holds a fresh access token.
/// Amounts are in minor currency units (øre).
#[derive(Debug, Clone, Copy)]
pub struct Payment<'a> {
    client: &'a Vipps,
}

impl<'a> Payment<'a> {
    pub(crate) const fn new(client: &'a Vipps) -> Self {
        Self { client }
    }

    /// Starts a payment and returns the URL to send the user to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrderId`] before anything is sent if the order
    /// id is unusable, [`Error::Provider`] if the provider rejects the
    /// payment, [`Error::Transport`] if it could not be reached, and
    /// [`Error::Parse`] if the response is unreadable.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(
            name = "vipps.payment.initiate",
            skip(self, transaction_text, callback_prefix, fall_back, options),
            err
        )
    )]
    pub async fn initiate_payment(
        &self,
        order_id: &str,
        amount: u64,
        transaction_text: &str,
        callback_prefix: &str,
        fall_back: &str,
        options: InitiatePaymentOptions,
    ) -> Result<InitiatePaymentResponse, Error> {
        validate_order_id(order_id)?;
        self.client
            .dispatch(|session| {
                InitiatePayment::new(
                    session,
                    order_id,
                    amount,
                    transaction_text,
                    callback_prefix,
                    fall_back,
                    options,
                )
            })
            .await
    }

    /// Captures `amount` of a reserved payment.
    ///
    /// # Errors
    ///
    /// See [`initiate_payment`](Self::initiate_payment).
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "vipps.payment.capture", skip(self, transaction_text), err)
    )]
    pub async fn capture_payment(
        &self,
        order_id: &str,
        transaction_text: &str,
        amount: u64,
    ) -> Result<CapturePaymentResponse, Error> {
        validate_order_id(order_id)?;
        self.client
            .dispatch(|session| CapturePayment::new(session, order_id, transaction_text, amount))
            .await
    }

    /// Cancels a payment that has not been captured.
    ///
    /// # Errors
    ///
    /// See [`initiate_payment`](Self::initiate_payment).
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "vipps.payment.cancel", skip(self, transaction_text), err)
    )]
    pub async fn cancel_payment(
        &self,
        order_id: &str,
        transaction_text: &str,
    ) -> Result<CancelPaymentResponse, Error> {
        validate_order_id(order_id)?;
        self.client
            .dispatch(|session| CancelPayment::new(session, order_id, transaction_text))
            .await
    }

    /// Refunds `amount` of a captured payment.
    ///
    /// # Errors
    ///
    /// See [`initiate_payment`](Self::initiate_payment).
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "vipps.payment.refund", skip(self, transaction_text), err)
    )]
    pub async fn refund_payment(
        &self,
        order_id: &str,
        transaction_text: &str,
        amount: u64,
    ) -> Result<RefundPaymentResponse, Error> {
        validate_order_id(order_id)?;
        self.client
            .dispatch(|session| RefundPayment::new(session, order_id, transaction_text, amount))
            .await
    }

    /// Returns the latest status of an order.
    ///
    /// # Errors
    ///
    /// See [`initiate_payment`](Self::initiate_payment).
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "vipps.payment.status", skip(self), err)
    )]
    pub async fn get_order_status(&self, order_id: &str) -> Result<OrderStatusResponse, Error> {
        validate_order_id(order_id)?;
        self.client
            .dispatch(|session| GetOrderStatus::new(session, order_id))
            .await
    }

    /// Returns the full transaction history of an order.
    ///
    /// # Errors
    ///
    /// See [`initiate_payment`](Self::initiate_payment).
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "vipps.payment.details", skip(self), err)
    )]
    pub async fn get_payment_details(
        &self,
        order_id: &str,
    ) -> Result<PaymentDetailsResponse, Error> {
        validate_order_id(order_id)?;
        self.client
            .dispatch(|session| GetPaymentDetails::new(session, order_id))
            .await
    }
}
