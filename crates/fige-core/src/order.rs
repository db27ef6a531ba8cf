//! Sanitized order data.
//!
//! An order exists only inside Stripe's own records; what we hand back to a
//! buyer is the minimal projection of a checkout session that is safe to
//! show in a browser.

use serde::Serialize;

/// Display name used when a session carries no product name.
pub const FALLBACK_PRODUCT_NAME: &str = "Figé Spinner";

/// The non-sensitive projection of a completed checkout session.
///
/// Exists only transiently in an HTTP response; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
    /// Buyer email as recorded by Stripe.
    pub email: Option<String>,
    /// Total amount in USD cents.
    pub amount: Option<i64>,
    /// Product display name.
    pub product: String,
}

/// Normalize a stored product name for display.
///
/// Sessions recorded by earlier storefront revisions doubled the hash when
/// the unit identifier (itself `"#NN"`) was appended after a literal `#`,
/// producing names like `"Figé ##03"`. Collapse that to a single hash, and
/// fall back to [`FALLBACK_PRODUCT_NAME`] when the name is absent.
#[must_use]
pub fn normalize_product_name(name: Option<&str>) -> String {
    match name {
        Some(name) => name.replace("##", "#"),
        None => FALLBACK_PRODUCT_NAME.to_string(),
    }
}

/// Format an amount of USD cents for display, e.g. `50000` → `"$500.00"`.
#[must_use]
pub fn format_usd(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("{sign}${}.{:02}", cents / 100, cents % 100)
}
