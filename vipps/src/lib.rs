#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Client for the Vipps eCommerce payment API.
//!
//! Each remote operation is a [`Resource`](resource::Resource): a fixed
//! method and path, the headers it needs, an optional JSON body, and the
//! Model its response parses into. Api facades ([`Payment`], [`Authorization`])
//! turn method arguments into Resources and run them against a
//! [`Transport`](http::Transport) owned by the [`Vipps`] client root, which
//! also caches the bearer token every payment call needs.
//!
//! # Example
//!
//! ```rust,no_run
//! use vipps::{Credentials, Environment, InitiatePaymentOptions, Vipps};
//!
//! # async fn run() -> Result<(), vipps::Error> {
//! let client = Vipps::try_new(
//!     Credentials::new("client-id", "client-secret", "subscription-key", "123456"),
//!     Environment::Test,
//! )?;
//!
//! let initiated = client
//!     .payment()
//!     .initiate_payment(
//!         "order-1001",
//!         1200,
//!         "Two pairs of socks",
//!         "https://shop.example/vipps/callback",
//!         "https://shop.example/order/1001",
//!         InitiatePaymentOptions::default().with_mobile_number("91234567"),
//!     )
//!     .await?;
//! println!("redirect the user to {}", initiated.url);
//!
//! let captured = client
//!     .payment()
//!     .capture_payment("order-1001", "Shipped", 1200)
//!     .await?;
//! println!("{:?}", captured.transaction_summary);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`api`] — Caller-facing facades, one method per business operation
//! - [`client`] — The [`Vipps`] client root
//! - [`config`] — Credentials, environments and client configuration
//! - [`constants`] — Header names, paths and base URLs
//! - [`error`] — Transport, provider and parse errors
//! - [`http`] — HTTP method, request/response tuples and the transport contract
//! - [`options`] — Optional parameters of payment initiation
//! - [`resource`] — Request/response mapping per operation
//! - [`token`] — Access token freshness and caching
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation of requests and token refreshes

pub mod api;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod http;
pub mod options;
pub mod resource;
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{Authorization, Payment};
pub use client::Vipps;
pub use config::{Credentials, Environment, VippsConfig};
pub use error::{Error, ParseError, ProviderError, TransportError};
pub use options::InitiatePaymentOptions;
pub use vipps_proto as proto;
