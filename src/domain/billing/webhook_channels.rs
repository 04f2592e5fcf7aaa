//! Webhook channels: what each endpoint reacts to and what it calls.
//!
//! The subscriptions and invoices endpoints share one dispatcher design and
//! differ only in their event taxonomy, embedded object type, and
//! state-update collaborator.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::invoice::Invoice;
use super::stripe_event::{InvoiceEventType, SubscriptionEventType};
use super::subscription::Subscription;
use crate::domain::foundation::DomainError;
use crate::ports::{InvoiceUpdateHandler, SubscriptionChangeHandler};

/// One class of webhook deliveries.
#[async_trait]
pub trait WebhookChannel: Send + Sync {
    /// Object embedded in the events this channel acts on.
    type Object: DeserializeOwned + Send;

    /// Channel name for logs.
    const NAME: &'static str;

    /// Returns true if `event_type` triggers the state update.
    fn recognizes(event_type: &str) -> bool;

    /// Identifier of the local subscription record the object refers to.
    fn local_record_id(object: &Self::Object) -> Option<&str>;

    /// Hand the object to the state-update collaborator.
    async fn apply(&self, object: Self::Object) -> Result<(), DomainError>;
}

/// `customer.subscription.*` lifecycle events.
pub struct SubscriptionChannel {
    handler: Arc<dyn SubscriptionChangeHandler>,
}

impl SubscriptionChannel {
    pub fn new(handler: Arc<dyn SubscriptionChangeHandler>) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl WebhookChannel for SubscriptionChannel {
    type Object = Subscription;

    const NAME: &'static str = "subscriptions";

    fn recognizes(event_type: &str) -> bool {
        SubscriptionEventType::parse(event_type).is_some()
    }

    fn local_record_id(object: &Subscription) -> Option<&str> {
        Some(object.id.as_str())
    }

    async fn apply(&self, object: Subscription) -> Result<(), DomainError> {
        self.handler.on_subscription_changed(object).await
    }
}

/// `invoice.updated` events.
pub struct InvoiceChannel {
    handler: Arc<dyn InvoiceUpdateHandler>,
}

impl InvoiceChannel {
    pub fn new(handler: Arc<dyn InvoiceUpdateHandler>) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl WebhookChannel for InvoiceChannel {
    type Object = Invoice;

    const NAME: &'static str = "invoices";

    fn recognizes(event_type: &str) -> bool {
        InvoiceEventType::parse(event_type).is_some()
    }

    // One-off invoices carry no subscription and never match a local record.
    fn local_record_id(object: &Invoice) -> Option<&str> {
        object.subscription_id()
    }

    async fn apply(&self, object: Invoice) -> Result<(), DomainError> {
        self.handler.on_invoice_updated(object).await
    }
}
