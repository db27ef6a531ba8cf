//! End-to-end checkout flow tests against a mock Stripe API.
//!
//! The router runs in-process via `axum-test`; a `wiremock` server stands in
//! for `api.stripe.com`, so these tests assert the request payloads we send
//! to Stripe as well as the responses we hand back to the browser.

use axum_test::TestServer;
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fige_service::{create_router, AppState, ServiceConfig, SessionCrypto};

const ENCRYPTION_KEY: &str = "integration-test-key";

/// Build a test server wired to the given mock Stripe base URL.
fn test_server(stripe_base: &str) -> TestServer {
    let config = ServiceConfig {
        stripe_secret_key: Some("sk_test_xxx".into()),
        stripe_publishable_key: Some("pk_test_xxx".into()),
        stripe_api_base: Some(stripe_base.to_string()),
        encryption_key: Some(ENCRYPTION_KEY.into()),
        ..ServiceConfig::default()
    };

    let state = AppState::new(config);
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

/// An expanded session response as Stripe returns it, with the product name
/// recorded by an earlier revision (doubled hash).
fn expanded_session_json(session_id: &str) -> Value {
    json!({
        "id": session_id,
        "object": "checkout.session",
        "payment_status": "paid",
        "status": "complete",
        "amount_total": 50000,
        "client_reference_id": "fige-1754650000123-9f1c2b3a",
        "metadata": { "unit_id": "#03" },
        "customer_details": {
            "email": "buyer@example.com",
            "name": "A Buyer"
        },
        "line_items": {
            "object": "list",
            "data": [{
                "id": "li_1",
                "quantity": 1,
                "price": {
                    "id": "price_1",
                    "unit_amount": 50000,
                    "product": {
                        "id": "prod_1",
                        "name": "Figé Luxury Fidget Spinner ##03 (Pre-Order)"
                    }
                }
            }],
            "has_more": false
        }
    })
}

#[tokio::test]
async fn create_session_sends_fixed_price_line_item() {
    let stripe = MockServer::start().await;

    // Assert the payload Stripe receives: one $500.00 line item, payment
    // mode, the unit id as metadata, and the redirect placeholders. Keys
    // arrive form-encoded, hence the percent escapes.
    Mock::given(method("POST"))
        .and(path("/checkout/sessions"))
        .and(body_string_contains("mode=payment"))
        .and(body_string_contains(
            "line_items%5B0%5D%5Bprice_data%5D%5Bunit_amount%5D=50000",
        ))
        .and(body_string_contains(
            "line_items%5B0%5D%5Bprice_data%5D%5Bcurrency%5D=usd",
        ))
        .and(body_string_contains("line_items%5B0%5D%5Bquantity%5D=1"))
        .and(body_string_contains("metadata%5Bunit_id%5D=%2303"))
        .and(body_string_contains("client_reference_id=fige-"))
        .and(body_string_contains(
            "session_id%3D%7BCHECKOUT_SESSION_ID%7D",
        ))
        .and(body_string_contains("payment-cancelled%3Dtrue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_abc123",
            "object": "checkout.session",
            "url": "https://checkout.stripe.com/c/pay/cs_test_abc123"
        })))
        .expect(1)
        .mount(&stripe)
        .await;

    let server = test_server(&stripe.uri());

    let response = server
        .post("/api/checkout_sessions")
        .json(&json!({ "unitId": "#03" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["sessionId"], "cs_test_abc123");
}

#[tokio::test]
async fn create_session_sets_encrypted_cookie() {
    let stripe = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/checkout/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_cookie1",
            "object": "checkout.session"
        })))
        .mount(&stripe)
        .await;

    let server = test_server(&stripe.uri());

    let response = server
        .post("/api/checkout_sessions")
        .json(&json!({ "unitId": "#04" }))
        .await;

    response.assert_status_ok();

    let cookie = response
        .maybe_cookie("stripe_session")
        .expect("session cookie is set");
    assert!(cookie.http_only().unwrap_or(false));

    // The cookie holds the encrypted session handle, recoverable with the
    // configured key.
    let crypto = SessionCrypto::from_key_material(Some(ENCRYPTION_KEY));
    assert_eq!(
        crypto.decrypt(cookie.value()).expect("cookie decrypts"),
        "cs_test_cookie1"
    );
}

#[tokio::test]
async fn create_session_rejects_bad_units() {
    let stripe = MockServer::start().await;
    let server = test_server(&stripe.uri());

    // Empty unit id
    let response = server
        .post("/api/checkout_sessions")
        .json(&json!({ "unitId": "" }))
        .await;
    response.assert_status_bad_request();

    // Unknown unit
    let response = server
        .post("/api/checkout_sessions")
        .json(&json!({ "unitId": "#99" }))
        .await;
    response.assert_status_bad_request();

    // Sold unit
    let response = server
        .post("/api/checkout_sessions")
        .json(&json!({ "unitId": "#01" }))
        .await;
    assert_eq!(response.status_code(), 409);

    // Nothing reached Stripe
    assert!(stripe.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_session_hides_provider_errors() {
    let stripe = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/checkout/sessions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "type": "invalid_request_error",
                "message": "Invalid API Key provided: sk_test_xxx",
                "code": "api_key_invalid"
            }
        })))
        .mount(&stripe)
        .await;

    let server = test_server(&stripe.uri());

    let response = server
        .post("/api/checkout_sessions")
        .json(&json!({ "unitId": "#03" }))
        .await;

    assert_eq!(response.status_code(), 500);
    let text = response.text();
    assert!(!text.contains("sk_test_xxx"));
    assert!(!text.contains("Invalid API Key"));
    let body: Value = response.json();
    assert!(!body["error"].as_str().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn verify_returns_sanitized_order() {
    let stripe = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/checkout/sessions/cs_test_abc123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(expanded_session_json("cs_test_abc123")),
        )
        .mount(&stripe)
        .await;

    let server = test_server(&stripe.uri());

    let response = server
        .get("/api/checkout_sessions/verify")
        .add_query_param("session_id", "cs_test_abc123")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["order"]["email"], "buyer@example.com");
    assert_eq!(body["order"]["amount"], 50000);
    // The doubled hash recorded on the session is collapsed for display.
    assert_eq!(
        body["order"]["product"],
        "Figé Luxury Fidget Spinner #03 (Pre-Order)"
    );
}

#[tokio::test]
async fn verify_resolves_handle_from_cookie() {
    let stripe = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/checkout/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_viacookie",
            "object": "checkout.session"
        })))
        .mount(&stripe)
        .await;
    Mock::given(method("GET"))
        .and(path("/checkout/sessions/cs_test_viacookie"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(expanded_session_json("cs_test_viacookie")),
        )
        .mount(&stripe)
        .await;

    let server = test_server(&stripe.uri());

    let create = server
        .post("/api/checkout_sessions")
        .json(&json!({ "unitId": "#05" }))
        .await;
    let cookie = create
        .maybe_cookie("stripe_session")
        .expect("session cookie is set");

    // No session_id in the query; the handle comes from the cookie.
    let response = server
        .get("/api/checkout_sessions/verify")
        .add_cookie(cookie)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);

    // Successful verification clears the cookie.
    let cleared = response
        .maybe_cookie("stripe_session")
        .expect("removal cookie is sent");
    assert!(cleared.value().is_empty());
}

#[tokio::test]
async fn verify_unknown_session_fails_closed() {
    let stripe = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/checkout/sessions/cs_test_missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "type": "invalid_request_error",
                "message": "No such checkout.session: 'cs_test_missing'",
                "code": "resource_missing"
            }
        })))
        .mount(&stripe)
        .await;

    let server = test_server(&stripe.uri());

    let response = server
        .get("/api/checkout_sessions/verify")
        .add_query_param("session_id", "cs_test_missing")
        .await;

    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    let message = body["message"].as_str().expect("failure message present");
    assert!(!message.is_empty());
    assert!(!message.contains("checkout.session"));
}

#[tokio::test]
async fn verify_provider_failure_fails_closed() {
    let stripe = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/checkout/sessions/cs_test_down"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&stripe)
        .await;

    let server = test_server(&stripe.uri());

    let response = server
        .get("/api/checkout_sessions/verify")
        .add_query_param("session_id", "cs_test_down")
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(!body["message"]
        .as_str()
        .unwrap_or_default()
        .contains("exploded"));
}

#[tokio::test]
async fn verify_without_identifier_is_rejected() {
    let stripe = MockServer::start().await;
    let server = test_server(&stripe.uri());

    let response = server.get("/api/checkout_sessions/verify").await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Missing session ID.");
    assert!(stripe.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn verify_by_reference_is_not_supported() {
    let stripe = MockServer::start().await;
    let server = test_server(&stripe.uri());

    let response = server
        .get("/api/checkout_sessions/verify")
        .add_query_param("ref", "fige-1754650000123-9f1c2b3a")
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    // No session scan happens on the provider side.
    assert!(stripe.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn cancelled_checkout_shows_banner_without_verification() {
    let stripe = MockServer::start().await;
    let server = test_server(&stripe.uri());

    let response = server
        .get("/")
        .add_query_param("payment-cancelled", "true")
        .await;

    response.assert_status_ok();
    assert!(response.text().contains("Your payment was cancelled"));

    // The landing page never talks to Stripe.
    assert!(stripe.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn landing_page_lists_the_run() {
    let stripe = MockServer::start().await;
    let server = test_server(&stripe.uri());

    let response = server.get("/").await;
    response.assert_status_ok();

    let text = response.text();
    assert!(!text.contains("Your payment was cancelled"));
    for unit in ["#01", "#02", "#03", "#04", "#05"] {
        assert!(text.contains(&format!("Figé {unit}")), "missing card {unit}");
    }
    // Two sold, three pre-order buttons.
    assert_eq!(text.matches(r#"data-unit-id=""#).count(), 3);
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let stripe = MockServer::start().await;
    let server = test_server(&stripe.uri());

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "fige-storefront");
}
