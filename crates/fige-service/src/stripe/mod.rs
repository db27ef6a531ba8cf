//! Stripe integration for the pre-order checkout flow.
//!
//! Stripe handles:
//! - Checkout session creation (hosted payment page)
//! - Session retrieval for payment verification
//!
//! Stripe's session store is the system of record for orders; this service
//! never caches or duplicates it.

pub mod client;
pub mod types;

pub use client::{CreateCheckoutSession, StripeClient, StripeError};
pub use types::*;
