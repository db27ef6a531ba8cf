//! Figé Storefront HTTP Service.
//!
//! This crate provides the HTTP service behind the Figé pre-order
//! storefront, including:
//!
//! - Checkout session creation against Stripe
//! - Payment verification on return from Stripe's hosted page
//! - The landing and confirmation pages
//!
//! # Flow
//!
//! The browser posts a unit identifier to `/api/checkout_sessions`, gets an
//! opaque session id back, and is redirected to Stripe's hosted checkout.
//! Stripe redirects the buyer to `/payment-success`, which calls
//! `/api/checkout_sessions/verify` to resolve the session into sanitized
//! order details. Stripe's session store is the only system of record;
//! nothing is persisted locally.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Page handlers need async for routing consistency

pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod routes;
pub mod state;
pub mod stripe;

pub use config::ServiceConfig;
pub use crypto::{CryptoError, SessionCrypto};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
pub use stripe::{StripeClient, StripeError};
