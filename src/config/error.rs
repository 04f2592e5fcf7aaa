//! Configuration errors.

use thiserror::Error;

/// Startup configuration failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment could not be read or deserialized (e.g. missing Stripe key).
    #[error("Failed to read configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// Values were read but are not usable.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

/// A configuration value that failed validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid listen address: {0}")]
    InvalidListenAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid Stripe secret key format")]
    InvalidStripeKey,

    #[error("Invalid Stripe webhook secret format for {0}")]
    InvalidStripeWebhookSecret(&'static str),

    #[error("Signature tolerance must not be negative")]
    InvalidSignatureTolerance,

    #[error("Invalid Stripe API base URL")]
    InvalidApiBaseUrl,
}
