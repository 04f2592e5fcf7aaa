//! Listener settings for the billing gate server.
//!
//! Every field has a default, so a deployment only needs the Stripe key.

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound on request handling; Stripe abandons a delivery well before this.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Listener settings (`BILLING_GATE__SERVER__*`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// IP address to bind (`0.0.0.0`).
    pub host: String,
    /// TCP port (8080).
    pub port: u16,
    /// Deployment environment; production switches logs to JSON.
    pub environment: Environment,
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Per-request timeout in seconds (30).
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: Environment::default(),
            log_level: "info,billing_gate=debug,tower_http=info".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Address the listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ValidationError::InvalidListenAddress(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidListenAddress(format!(
                "{}:0",
                self.host
            )));
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        self.socket_addr().map(|_| ())
    }
}
