//! Stripe API client implementation.

use reqwest::Client;
use std::time::Duration;

use super::types::{CheckoutSession, StripeErrorResponse};

/// Checkout currency. The storefront is single-currency.
const CURRENCY: &str = "usd";

/// Error type for Stripe operations.
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe API returned an error.
    #[error("Stripe API error: {error_type} - {message}")]
    Api {
        /// Error type.
        error_type: String,
        /// Error message.
        message: String,
        /// Error code.
        code: Option<String>,
    },
}

impl StripeError {
    /// Whether the error is Stripe telling us the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { code: Some(code), .. } if code == "resource_missing")
    }
}

/// Parameters for creating a checkout session.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSession<'a> {
    /// Unit identifier, stored as session metadata (e.g. `"#03"`).
    pub unit_id: &'a str,
    /// Product display name for the hosted page.
    pub product_name: &'a str,
    /// Product description for the hosted page.
    pub product_description: &'a str,
    /// Amount to charge in cents.
    pub amount_cents: i64,
    /// Locally generated reference attached as `client_reference_id`.
    pub client_reference_id: &'a str,
    /// URL to redirect on success.
    pub success_url: &'a str,
    /// URL to redirect on cancel.
    pub cancel_url: &'a str,
}

/// Stripe API client.
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl StripeClient {
    /// Stripe API base URL.
    const BASE_URL: &'static str = "https://api.stripe.com/v1";

    /// Create a new Stripe client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Stripe secret API key (`sk_test_...` or `sk_live_...`)
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, Self::BASE_URL)
    }

    /// Create a client against a non-default API base URL.
    ///
    /// Used by tests to point the client at a mock server.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a Checkout session for a pre-order unit.
    ///
    /// The session has a single fixed-price line item, `mode=payment`, and
    /// carries the unit identifier as metadata plus the caller's reference
    /// string for later reverse lookup.
    pub async fn create_checkout_session(
        &self,
        params: CreateCheckoutSession<'_>,
    ) -> Result<CheckoutSession, StripeError> {
        let form = [
            ("mode", "payment".to_string()),
            ("payment_method_types[0]", "card".to_string()),
            ("success_url", params.success_url.to_string()),
            ("cancel_url", params.cancel_url.to_string()),
            (
                "client_reference_id",
                params.client_reference_id.to_string(),
            ),
            ("line_items[0][price_data][currency]", CURRENCY.to_string()),
            (
                "line_items[0][price_data][product_data][name]",
                params.product_name.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][description]",
                params.product_description.to_string(),
            ),
            (
                "line_items[0][price_data][unit_amount]",
                params.amount_cents.to_string(),
            ),
            ("line_items[0][quantity]", "1".to_string()),
            ("metadata[unit_id]", params.unit_id.to_string()),
        ];

        tracing::debug!(
            unit_id = %params.unit_id,
            amount_cents = %params.amount_cents,
            client_reference_id = %params.client_reference_id,
            "Creating Stripe checkout session"
        );

        let response = self
            .client
            .post(format!("{}/checkout/sessions", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&form)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Retrieve a Checkout session by ID, with line items and customer
    /// details expanded.
    pub async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, StripeError> {
        let response = self
            .client
            .get(format!("{}/checkout/sessions/{}", self.base_url, session_id))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .query(&[
                ("expand[]", "line_items.data.price.product"),
                ("expand[]", "customer_details"),
            ])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<StripeErrorResponse, _> = response.json().await;

        match error_body {
            Ok(stripe_error) => Err(StripeError::Api {
                error_type: stripe_error.error.error_type,
                message: stripe_error
                    .error
                    .message
                    .unwrap_or_else(|| format!("HTTP {status}")),
                code: stripe_error.error.code,
            }),
            Err(_) => Err(StripeError::Api {
                error_type: "unknown".to_string(),
                message: format!("HTTP {status}"),
                code: None,
            }),
        }
    }
}
