//! Pro checkout through a Polar-compatible payments API.
//!
//! [`PolarClient::create_checkout`] opens a hosted checkout session and
//! returns its URL; after the redirect back, [`PolarClient::verify_checkout`]
//! looks the session up and reports whether it succeeded.

mod client;
mod error;

pub use client::{CheckoutSession, CheckoutVerification, PolarClient, PolarConfig, CHECKOUT_ID_PLACEHOLDER};
pub use error::{BillingError, BillingResult};
