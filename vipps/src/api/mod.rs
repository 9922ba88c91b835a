//! Caller-facing facades.
//!
//! A facade borrows the [`Vipps`](crate::Vipps) client root and exposes one
//! async method per business operation. Each method builds the matching
//! [`Resource`](crate::resource::Resource), runs it and hands back the parsed
//! Model or the error unchanged.

pub mod authorization;
pub mod payment;

pub use authorization::Authorization;
pub use payment::Payment;
