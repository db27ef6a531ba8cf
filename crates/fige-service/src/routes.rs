//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{checkout, health, verify};
use crate::pages;
use crate::state::AppState;

/// Maximum concurrent requests for the checkout API endpoints.
/// A five-unit run never sees meaningful contention; this is overload
/// protection for the upstream Stripe calls.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Pages
/// - `GET /` - Landing page with the unit cards
/// - `GET /payment-success` - Order confirmation page
///
/// ## API
/// - `POST /api/checkout_sessions` - Create a checkout session
/// - `GET /api/checkout_sessions/verify` - Verify a completed session
///
/// ## Public
/// - `GET /health` - Health check
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    // Create concurrency-limited API routes
    let api_routes = Router::new()
        .route("/checkout_sessions", post(checkout::create_checkout_session))
        .route(
            "/checkout_sessions/verify",
            get(verify::verify_checkout_session),
        )
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Pages
        .route("/", get(pages::landing))
        .route("/payment-success", get(pages::payment_success))
        // Health (public, no rate limit)
        .route("/health", get(health::health))
        // API routes
        .nest("/api", api_routes)
        // Global middleware
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
