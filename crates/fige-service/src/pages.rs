//! Server-rendered storefront pages.
//!
//! Two pages, no templating engine: the landing page with the five unit
//! cards, and the confirmation page shown when Stripe redirects the buyer
//! back. Presentation lives entirely here; the checkout and verification
//! services know nothing about it.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;

use fige_core::{catalog, format_usd, Unit, UNIT_PRICE_USD_CENTS};

use crate::state::AppState;

/// Landing page query parameters.
#[derive(Debug, Deserialize)]
pub struct LandingQuery {
    /// Set by the cancel redirect from Stripe's hosted page.
    #[serde(default, rename = "payment-cancelled")]
    pub payment_cancelled: Option<String>,
}

/// Banner shown after a cancelled checkout.
const CANCELLED_BANNER: &str = r#"<div class="banner" role="status">
  Your payment was cancelled. Your unit is still available.
</div>"#;

/// Client script for the pre-order buttons: create a session, then hand the
/// id to Stripe.js for the redirect.
const CHECKOUT_SCRIPT: &str = r#"
const stripe = Stripe(window.STRIPE_PUBLISHABLE_KEY || "");

async function preOrder(unitId) {
  try {
    const response = await fetch("/api/checkout_sessions", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify({ unitId }),
    });
    if (!response.ok) throw new Error("HTTP error! status: " + response.status);
    const { sessionId } = await response.json();
    const { error } = await stripe.redirectToCheckout({ sessionId });
    if (error) console.error("Stripe checkout error:", error);
  } catch (error) {
    console.error("Failed to create checkout session:", error);
  }
}

for (const button of document.querySelectorAll("[data-unit-id]")) {
  button.addEventListener("click", () => preOrder(button.dataset.unitId));
}
"#;

/// Render one unit card.
fn unit_card(unit: &Unit) -> String {
    let mut card = String::new();
    let sold = if unit.is_sold() { " sold" } else { "" };
    let _ = write!(
        card,
        r#"<div class="card{sold}"><img src="{img}" alt="Figé Spinner Unit {n}"><h3>Figé {id}</h3>"#,
        img = unit.image_url,
        n = unit.unit_number,
        id = unit.id(),
    );
    if unit.is_sold() {
        card.push_str("<p>Sold</p>");
    } else {
        let _ = write!(
            card,
            r#"<p>{price}</p><button data-unit-id="{id}">Pre-Order</button>"#,
            price = format_usd(UNIT_PRICE_USD_CENTS),
            id = unit.id(),
        );
    }
    card.push_str("</div>");
    card
}

/// Landing page: the five unit cards, plus the cancellation banner when the
/// cancel redirect brought the buyer back.
pub async fn landing(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LandingQuery>,
) -> Html<String> {
    let banner = if query.payment_cancelled.as_deref() == Some("true") {
        CANCELLED_BANNER
    } else {
        ""
    };

    let cards: String = catalog().iter().map(unit_card).collect();
    let publishable_key = state
        .config
        .stripe_publishable_key
        .clone()
        .unwrap_or_default();

    let mut page = String::from(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>Figé — Secure Your Exclusive Unit</title>\
         <script src=\"https://js.stripe.com/v3/\"></script></head><body>",
    );
    page.push_str(banner);
    page.push_str("<h2>Secure Your Exclusive Unit</h2><div class=\"units\">");
    page.push_str(&cards);
    page.push_str("</div><script>window.STRIPE_PUBLISHABLE_KEY = ");
    // serde_json string rendering doubles as JS string escaping here.
    page.push_str(&serde_json::to_string(&publishable_key).unwrap_or_else(|_| "\"\"".into()));
    page.push_str(";</script><script>");
    page.push_str(CHECKOUT_SCRIPT);
    page.push_str("</script></body></html>");

    Html(page)
}

/// Confirmation page: verification happens client-side against the API.
pub async fn payment_success() -> Html<&'static str> {
    Html(concat!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">",
        "<title>Figé — Order Confirmation</title></head><body>",
        "<div id=\"order\"><p>Loading...</p></div>",
        "<script>",
        r#"
async function showOrder() {
  const container = document.getElementById("order");
  const sessionId = new URLSearchParams(window.location.search).get("session_id");

  const fail = (message) => {
    container.innerHTML =
      "<h1>Payment Verification Failed</h1><p></p><a href=\"/\">Return to Homepage</a>";
    container.querySelector("p").textContent = message;
  };

  if (!sessionId) {
    fail("Missing session ID.");
    return;
  }

  try {
    const res = await fetch("/api/checkout_sessions/verify?session_id=" + encodeURIComponent(sessionId));
    const data = await res.json();
    if (!res.ok || !data.success || !data.order) {
      fail(data.message || "Could not verify payment.");
      return;
    }
    const amount = data.order.amount == null
      ? ""
      : "$" + (data.order.amount / 100).toFixed(2);
    container.innerHTML =
      "<h1>Thank You For Your Pre-Order</h1>" +
      "<p class=\"product\"></p><p class=\"amount\"></p><p class=\"email\"></p>" +
      "<a href=\"/\">Return to Homepage</a>";
    container.querySelector(".product").textContent = data.order.product;
    container.querySelector(".amount").textContent = amount;
    container.querySelector(".email").textContent =
      data.order.email ? "A receipt was sent to " + data.order.email : "";
  } catch (error) {
    fail("There was a problem verifying your payment. Please contact support if the charge appears on your statement.");
  }
}

showOrder();
"#,
        "</script></body></html>"
    ))
}
