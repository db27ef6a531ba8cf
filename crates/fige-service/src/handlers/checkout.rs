//! Checkout session creation.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tower_cookies::cookie::time::Duration;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};

use fige_core::{find_unit, generate_client_reference, UNIT_PRICE_USD_CENTS};

use super::STRIPE_SESSION_COOKIE;
use crate::error::ApiError;
use crate::state::AppState;
use crate::stripe::CreateCheckoutSession;

/// Lifetime of the encrypted session-handle cookie.
const SESSION_COOKIE_MAX_AGE: Duration = Duration::hours(1);

/// Description shown on Stripe's hosted page.
const PRODUCT_DESCRIPTION: &str =
    "Limited run, numbered unit. Carbon-fiber PLA, brass bearings, brass inlay.";

/// Create checkout session request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    /// Unit display identifier, e.g. `"#03"`.
    pub unit_id: String,
}

/// Create checkout session response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutResponse {
    /// Opaque Stripe session ID for the client-side redirect.
    pub session_id: String,
}

/// Create a Stripe checkout session for a pre-order unit.
pub async fn create_checkout_session(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(body): Json<CreateCheckoutRequest>,
) -> Result<Json<CreateCheckoutResponse>, ApiError> {
    let unit_id = body.unit_id.trim();
    if unit_id.is_empty() {
        return Err(ApiError::BadRequest("Missing unit id".into()));
    }

    let unit = find_unit(unit_id)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown unit: {unit_id}")))?;
    if unit.is_sold() {
        return Err(ApiError::Conflict(format!(
            "Unit {unit_id} is already sold"
        )));
    }

    let stripe = state
        .stripe
        .as_ref()
        .ok_or_else(|| ApiError::PaymentProvider("Stripe not configured".into()))?;

    // {CHECKOUT_SESSION_ID} is substituted by Stripe at redirect time.
    let success_url = format!(
        "{}/payment-success?session_id={{CHECKOUT_SESSION_ID}}",
        state.config.base_url
    );
    let cancel_url = format!("{}/?payment-cancelled=true", state.config.base_url);

    let client_reference_id = generate_client_reference();
    let product_name = format!("Figé Luxury Fidget Spinner {} (Pre-Order)", unit.id());

    let session = stripe
        .create_checkout_session(CreateCheckoutSession {
            unit_id,
            product_name: &product_name,
            product_description: PRODUCT_DESCRIPTION,
            amount_cents: UNIT_PRICE_USD_CENTS,
            client_reference_id: &client_reference_id,
            success_url: &success_url,
            cancel_url: &cancel_url,
        })
        .await
        .map_err(|e| ApiError::PaymentProvider(e.to_string()))?;

    tracing::info!(
        unit_id = %unit_id,
        session_id = %session.id,
        client_reference_id = %client_reference_id,
        "Checkout session created"
    );

    // Best effort: failing to store the cookie must not fail the request.
    match state.crypto.encrypt(&session.id) {
        Ok(value) => {
            let mut cookie = Cookie::new(STRIPE_SESSION_COOKIE, value);
            cookie.set_path("/");
            cookie.set_http_only(true);
            cookie.set_same_site(SameSite::Lax);
            cookie.set_secure(state.config.production);
            cookie.set_max_age(SESSION_COOKIE_MAX_AGE);
            cookies.add(cookie);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not encrypt session cookie, continuing without it");
        }
    }

    Ok(Json(CreateCheckoutResponse {
        session_id: session.id,
    }))
}
