//! Payment verification.
//!
//! Resolves a returned session handle to a completed Stripe session and
//! projects it into sanitized order data. Every failure path returns
//! `success: false` with a generic message; Stripe's error internals stay
//! in the server logs.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies};

use fige_core::{normalize_product_name, OrderDetails};

use super::STRIPE_SESSION_COOKIE;
use crate::state::AppState;

/// Generic failure message shown to buyers.
const VERIFY_FAILED_MESSAGE: &str = "There was a problem verifying your payment. \
     Please contact support if the charge appears on your statement.";

/// Verification query parameters.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    /// Session handle returned by Stripe's success redirect.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Client reference string (recognized but not resolvable; see handler).
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
}

/// Verification response body.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    /// Whether the payment was verified.
    pub success: bool,
    /// Sanitized order data, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderDetails>,
    /// Failure message, present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn failure(status: StatusCode, message: &str) -> (StatusCode, Json<VerifyResponse>) {
    (
        status,
        Json(VerifyResponse {
            success: false,
            order: None,
            message: Some(message.to_string()),
        }),
    )
}

/// Verify a checkout session and return sanitized order details.
pub async fn verify_checkout_session(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Query(query): Query<VerifyQuery>,
) -> (StatusCode, Json<VerifyResponse>) {
    // Resolve to a concrete session handle: the query parameter if present,
    // otherwise the handle recovered from the encrypted cookie. Both paths
    // end in a direct retrieval; there is no scan of recent sessions, which
    // could pair a buyer with someone else's order on a reference collision.
    let session_id = match query.session_id {
        Some(id) if !id.trim().is_empty() => Some(id),
        _ => cookies
            .get(STRIPE_SESSION_COOKIE)
            .and_then(|cookie| match state.crypto.decrypt(cookie.value()) {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding undecryptable session cookie");
                    None
                }
            }),
    };

    let Some(session_id) = session_id else {
        if query.reference.is_some() {
            return failure(
                StatusCode::BAD_REQUEST,
                "Payments cannot be verified by reference. Please use the link \
                 from your confirmation email or contact support.",
            );
        }
        return failure(StatusCode::BAD_REQUEST, "Missing session ID.");
    };

    let Some(stripe) = state.stripe.as_ref() else {
        tracing::error!("Verification requested but Stripe is not configured");
        return failure(StatusCode::INTERNAL_SERVER_ERROR, VERIFY_FAILED_MESSAGE);
    };

    let session = match stripe.retrieve_checkout_session(&session_id).await {
        Ok(session) => session,
        Err(e) if e.is_not_found() => {
            tracing::warn!(session_id = %session_id, "Verification requested for unknown session");
            return failure(StatusCode::NOT_FOUND, "Session not found.");
        }
        Err(e) => {
            tracing::error!(error = %e, session_id = %session_id, "Stripe session fetch failed");
            return failure(StatusCode::INTERNAL_SERVER_ERROR, VERIFY_FAILED_MESSAGE);
        }
    };

    // Only the essential fields, no sensitive information.
    let order = OrderDetails {
        email: session
            .customer_details
            .as_ref()
            .and_then(|details| details.email.clone()),
        amount: session.amount_total,
        product: normalize_product_name(session.product_name()),
    };

    // The cookie has served its purpose.
    let mut removal = Cookie::new(STRIPE_SESSION_COOKIE, "");
    removal.set_path("/");
    cookies.remove(removal);

    tracing::info!(session_id = %session.id, "Payment verified");

    (
        StatusCode::OK,
        Json(VerifyResponse {
            success: true,
            order: Some(order),
            message: None,
        }),
    )
}
