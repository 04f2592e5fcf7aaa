//! Service configuration from the environment.
//!
//! Variables use the `BILLING_GATE` prefix with `__` between levels; a
//! `.env` file is read first when present.
//!
//! | Variable | Field |
//! |---|---|
//! | `BILLING_GATE__PAYMENT__STRIPE_SECRET_KEY` | `payment.stripe_secret_key` (required) |
//! | `BILLING_GATE__PAYMENT__SUBSCRIPTIONS_ENDPOINT_SECRET` | `payment.subscriptions_endpoint_secret` |
//! | `BILLING_GATE__PAYMENT__INVOICES_ENDPOINT_SECRET` | `payment.invoices_endpoint_secret` |
//! | `BILLING_GATE__SERVER__PORT` | `server.port` |
//!
//! ```no_run
//! use billing_gate::config::AppConfig;
//!
//! let config = AppConfig::load_validated()?;
//! println!("Stripe test mode: {}", config.payment.is_test_mode());
//! # Ok::<(), billing_gate::config::ConfigError>(())
//! ```

mod error;
mod payment;
mod server;

pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

const ENV_PREFIX: &str = "BILLING_GATE";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Read configuration from `.env` and the process environment.
    ///
    /// # Errors
    ///
    /// `ConfigError::Load` if the Stripe key is missing or a value has the
    /// wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// [`load`](Self::load) followed by [`validate`](Self::validate).
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate()
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Webhook channels that will accept unsigned deliveries.
    pub fn unsigned_channels(&self) -> Vec<&'static str> {
        let mut channels = Vec::new();
        if self.payment.subscriptions_secret().is_none() {
            channels.push("subscriptions");
        }
        if self.payment.invoices_secret().is_none() {
            channels.push("invoices");
        }
        channels
    }
}
