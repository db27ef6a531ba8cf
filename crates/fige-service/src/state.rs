//! Application state.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::crypto::SessionCrypto;
use crate::stripe::StripeClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: ServiceConfig,

    /// Stripe client for checkout (absent when no key is configured).
    pub stripe: Option<Arc<StripeClient>>,

    /// Cipher for the session-handle cookie.
    pub crypto: Arc<SessionCrypto>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The Stripe client and session cipher are constructed once here and
    /// shared by reference; handlers never reinitialize them per request.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        let stripe = config.stripe_secret_key.as_ref().map(|key| {
            tracing::info!("Stripe integration enabled");
            let client = match &config.stripe_api_base {
                Some(base) => StripeClient::with_base_url(key, base),
                None => StripeClient::new(key),
            };
            Arc::new(client)
        });

        if stripe.is_none() {
            tracing::warn!("Stripe not configured - checkout will not be available");
        }

        let crypto = Arc::new(SessionCrypto::from_key_material(
            config.encryption_key.as_deref(),
        ));

        Self {
            config,
            stripe,
            crypto,
        }
    }

    /// Check if Stripe is configured.
    #[must_use]
    pub fn has_stripe(&self) -> bool {
        self.stripe.is_some()
    }
}
