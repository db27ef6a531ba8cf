//! Stripe API types.

use serde::Deserialize;

/// Stripe Checkout session object.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Session ID.
    pub id: String,
    /// Checkout URL to redirect the user to.
    #[serde(default)]
    pub url: Option<String>,
    /// Payment status.
    #[serde(default)]
    pub payment_status: Option<String>,
    /// Session status.
    #[serde(default)]
    pub status: Option<String>,
    /// Total amount in cents.
    #[serde(default)]
    pub amount_total: Option<i64>,
    /// Client reference ID (our locally generated reference string).
    #[serde(default)]
    pub client_reference_id: Option<String>,
    /// Metadata.
    #[serde(default)]
    pub metadata: serde_json::Value,
    /// Customer details (present when expanded).
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
    /// Line items (present when expanded).
    #[serde(default)]
    pub line_items: Option<StripeList<LineItem>>,
}

impl CheckoutSession {
    /// The stored product name of the first line item, when the session was
    /// retrieved with `line_items.data.price.product` expanded.
    #[must_use]
    pub fn product_name(&self) -> Option<&str> {
        self.line_items
            .as_ref()?
            .data
            .first()?
            .price
            .as_ref()?
            .product
            .as_ref()?
            .name()
    }
}

/// Customer details recorded on a session.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerDetails {
    /// Customer email.
    #[serde(default)]
    pub email: Option<String>,
    /// Customer name.
    #[serde(default)]
    pub name: Option<String>,
}

/// A checkout session line item.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItem {
    /// Line item ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Line item description.
    #[serde(default)]
    pub description: Option<String>,
    /// Quantity.
    #[serde(default)]
    pub quantity: Option<i64>,
    /// Price of the line item.
    #[serde(default)]
    pub price: Option<Price>,
}

/// Price attached to a line item.
#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    /// Price ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Unit amount in cents.
    #[serde(default)]
    pub unit_amount: Option<i64>,
    /// The product, either an ID or the expanded object.
    #[serde(default)]
    pub product: Option<ExpandableProduct>,
}

/// A product field that may or may not have been expanded.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExpandableProduct {
    /// Bare product ID (not expanded).
    Id(String),
    /// Expanded product object.
    Object(Product),
}

impl ExpandableProduct {
    /// The product display name, when expanded.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Object(product) => product.name.as_deref(),
        }
    }
}

/// Stripe product object.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: String,
    /// Product display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Stripe list response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeList<T> {
    /// Object type (always "list").
    #[serde(default)]
    pub object: String,
    /// Data items.
    pub data: Vec<T>,
    /// Whether there are more items.
    #[serde(default)]
    pub has_more: bool,
}

/// Stripe API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    /// Error details.
    pub error: StripeErrorDetail,
}

/// Stripe error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorDetail {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message.
    #[serde(default)]
    pub message: Option<String>,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Parameter that caused the error.
    #[serde(default)]
    pub param: Option<String>,
}
