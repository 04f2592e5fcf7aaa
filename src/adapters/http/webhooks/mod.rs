//! HTTP adapter for Stripe webhook endpoints.
//!
//! - `POST /webhooks/subscriptions` - subscription lifecycle events
//! - `POST /webhooks/invoices` - invoice updates
//!
//! Both endpoints are unauthenticated; deliveries are trusted only after
//! their Stripe-Signature header verifies against the endpoint secret.

mod handlers;
mod routes;

pub use handlers::{handle_invoice_webhook, handle_subscription_webhook, WebhookAppState};
pub use routes::{webhook_router, webhook_routes};
