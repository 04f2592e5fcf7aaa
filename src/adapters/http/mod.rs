//! HTTP adapters - axum surface for billing.
//!
//! - `webhooks` - Stripe webhook endpoints
//! - `middleware` - payment-required access gate for protected routes

pub mod dto;
pub mod middleware;
pub mod webhooks;

pub use middleware::{protect, AccessGate, RouteConfig};
pub use webhooks::{webhook_router, WebhookAppState};
