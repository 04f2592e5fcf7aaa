//! Billing domain module.
//!
//! Subscription and invoice records mirrored from Stripe, the access policy
//! for paid operations, and webhook dispatch.
//!
//! # Module Structure
//!
//! - `subscription` / `invoice` - Provider records
//! - `access` - Payment-required access policy
//! - `stripe_event` - Webhook envelope and per-channel event types
//! - `webhook_channels` - Subscriptions and invoices channel definitions
//! - `webhook_dispatcher` - Verify, classify, apply
//! - `webhook_errors` - Verification and dispatch errors

mod access;
mod invoice;
mod stripe_event;
mod subscription;
mod webhook_channels;
mod webhook_dispatcher;
mod webhook_errors;

pub use access::{evaluate_access, AccessDenied};
pub use invoice::Invoice;
pub use stripe_event::{InvoiceEventType, StripeEvent, StripeEventData, SubscriptionEventType};
pub use subscription::{Subscription, SubscriptionStatus};
pub use webhook_channels::{InvoiceChannel, SubscriptionChannel, WebhookChannel};
pub use webhook_dispatcher::{DispatchOutcome, WebhookDispatcher};
pub use webhook_errors::{SignatureVerificationError, WebhookError};

#[cfg(test)]
pub use stripe_event::StripeEventBuilder;
