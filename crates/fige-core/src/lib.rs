//! Core types for the Figé pre-order storefront.
//!
//! This crate provides the foundational types shared by the storefront
//! service:
//!
//! - **Catalog**: the static five-unit production run (`Unit`, `UnitStatus`)
//! - **Orders**: the sanitized order projection returned to buyers
//!   (`OrderDetails`)
//! - **References**: client reference strings attached to checkout sessions
//!
//! # Pricing
//!
//! Every unit sells at a single fixed price, stored as `i64` integer cents
//! to avoid floating point precision issues:
//!
//! **1 unit = $500.00 = 50 000 cents**

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod order;
pub mod reference;

pub use catalog::{catalog, find_unit, Unit, UnitStatus, UNIT_PRICE_USD_CENTS};
pub use order::{format_usd, normalize_product_name, OrderDetails, FALLBACK_PRODUCT_NAME};
pub use reference::generate_client_reference;
