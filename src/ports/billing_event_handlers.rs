//! State-update ports invoked after a verified webhook.
//!
//! Implementations persist or react to the provider's new view of a record.
//! They run only for recognized event types whose record exists locally.

use async_trait::async_trait;

use crate::domain::billing::{Invoice, Subscription};
use crate::domain::foundation::DomainError;

/// Reacts to subscription lifecycle events (created, updated, deleted,
/// trial ending).
#[async_trait]
pub trait SubscriptionChangeHandler: Send + Sync {
    async fn on_subscription_changed(&self, subscription: Subscription)
        -> Result<(), DomainError>;
}

/// Reacts to invoice updates.
#[async_trait]
pub trait InvoiceUpdateHandler: Send + Sync {
    async fn on_invoice_updated(&self, invoice: Invoice) -> Result<(), DomainError>;
}
