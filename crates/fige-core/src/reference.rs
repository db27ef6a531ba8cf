//! Client reference strings.
//!
//! Every checkout session gets a locally generated reference attached as
//! Stripe's `client_reference_id`. The reference is write-only from our
//! side: it exists so a specific purchase can be found again in the Stripe
//! dashboard (or via support) when the session handle itself was not
//! retained. Verification never resolves orders through it.

use chrono::Utc;

/// Generate a fresh client reference string.
///
/// Format: `fige-<unix millis>-<random suffix>`, e.g.
/// `fige-1754650000123-9f1c2b3a`. The millisecond timestamp keeps
/// references sortable in the dashboard; the random suffix keeps
/// same-millisecond references distinct.
#[must_use]
pub fn generate_client_reference() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("fige-{millis}-{}", &suffix[..8])
}
