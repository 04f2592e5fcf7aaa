//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_secret_key: SecretString,

    /// Signing secret for the subscriptions webhook endpoint.
    /// Absent or empty disables verification for that endpoint.
    #[serde(default)]
    pub subscriptions_endpoint_secret: Option<SecretString>,

    /// Signing secret for the invoices webhook endpoint.
    /// Absent or empty disables verification for that endpoint.
    #[serde(default)]
    pub invoices_endpoint_secret: Option<SecretString>,

    /// Maximum age of a signed webhook, in seconds (0 disables the check)
    #[serde(default = "default_signature_tolerance")]
    pub signature_tolerance_secs: i64,

    /// Base URL for the Stripe API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl PaymentConfig {
    /// Create a configuration with defaults for everything but the key.
    pub fn new(stripe_secret_key: impl Into<String>) -> Self {
        Self {
            stripe_secret_key: SecretString::new(stripe_secret_key.into()),
            subscriptions_endpoint_secret: None,
            invoices_endpoint_secret: None,
            signature_tolerance_secs: default_signature_tolerance(),
            api_base_url: default_api_base_url(),
        }
    }

    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        let key = self.stripe_secret_key.expose_secret();
        key.starts_with("sk_test_") || key.starts_with("rk_test_")
    }

    /// Subscriptions endpoint secret, if verification is enabled.
    pub fn subscriptions_secret(&self) -> Option<SecretString> {
        non_empty(&self.subscriptions_endpoint_secret)
    }

    /// Invoices endpoint secret, if verification is enabled.
    pub fn invoices_secret(&self) -> Option<SecretString> {
        non_empty(&self.invoices_endpoint_secret)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let key = self.stripe_secret_key.expose_secret();
        if key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_SECRET_KEY"));
        }

        // Verify key prefixes for safety
        if !key.starts_with("sk_") && !key.starts_with("rk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if let Some(secret) = self.subscriptions_secret() {
            if !secret.expose_secret().starts_with("whsec_") {
                return Err(ValidationError::InvalidStripeWebhookSecret(
                    "SUBSCRIPTIONS_ENDPOINT_SECRET",
                ));
            }
        }
        if let Some(secret) = self.invoices_secret() {
            if !secret.expose_secret().starts_with("whsec_") {
                return Err(ValidationError::InvalidStripeWebhookSecret(
                    "INVOICES_ENDPOINT_SECRET",
                ));
            }
        }

        if self.signature_tolerance_secs < 0 {
            return Err(ValidationError::InvalidSignatureTolerance);
        }
        if !self.api_base_url.starts_with("https://") && !self.api_base_url.starts_with("http://")
        {
            return Err(ValidationError::InvalidApiBaseUrl);
        }

        Ok(())
    }
}

fn non_empty(secret: &Option<SecretString>) -> Option<SecretString> {
    secret
        .as_ref()
        .filter(|s| !s.expose_secret().is_empty())
        .cloned()
}

fn default_signature_tolerance() -> i64 {
    300
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}
