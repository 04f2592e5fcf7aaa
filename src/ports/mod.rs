//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SubscriptionLookup` - Local subscription records (gate and webhooks)
//! - `SubscriptionChangeHandler` / `InvoiceUpdateHandler` - State updates
//! - `WebhookVerifier` - Provider signature verification

mod billing_event_handlers;
mod subscription_lookup;
mod webhook_verifier;

pub use billing_event_handlers::{InvoiceUpdateHandler, SubscriptionChangeHandler};
pub use subscription_lookup::SubscriptionLookup;
pub use webhook_verifier::WebhookVerifier;
