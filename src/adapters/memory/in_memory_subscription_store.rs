//! In-memory subscription store for development and testing.
//!
//! Implements the lookup and both state-update ports over a pair of maps.
//! Callers are identified by the `x-customer-id` request header.
//! Replace with a persistent implementation for production.
//!
//! # Usage
//!
//! ```ignore
//! use billing_gate::adapters::memory::InMemorySubscriptionStore;
//!
//! let store = Arc::new(InMemorySubscriptionStore::new());
//! store.insert(Subscription::new("sub_1", SubscriptionStatus::Active).with_customer("cus_1")).await;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use http::request::Parts;
use tokio::sync::RwLock;

use crate::domain::billing::{Invoice, Subscription};
use crate::domain::foundation::DomainError;
use crate::ports::{InvoiceUpdateHandler, SubscriptionChangeHandler, SubscriptionLookup};

/// Header carrying the caller's Stripe customer id.
pub const CUSTOMER_ID_HEADER: &str = "x-customer-id";

/// Subscriptions and invoices keyed by provider id.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionStore {
    subscriptions: RwLock<HashMap<String, Subscription>>,
    invoices: RwLock<HashMap<String, Invoice>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a subscription.
    pub async fn insert(&self, subscription: Subscription) {
        self.subscriptions
            .write()
            .await
            .insert(subscription.id.clone(), subscription);
    }

    pub async fn get(&self, subscription_id: &str) -> Option<Subscription> {
        self.subscriptions.read().await.get(subscription_id).cloned()
    }

    pub async fn invoice(&self, invoice_id: &str) -> Option<Invoice> {
        self.invoices.read().await.get(invoice_id).cloned()
    }
}

#[async_trait]
impl SubscriptionLookup for InMemorySubscriptionStore {
    async fn find_for_request(
        &self,
        request: &Parts,
    ) -> Result<Option<Subscription>, DomainError> {
        let Some(customer_id) = request
            .headers
            .get(CUSTOMER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
        else {
            return Ok(None);
        };

        // A customer may hold several subscriptions; an authorizing one wins.
        Ok(self
            .subscriptions
            .read()
            .await
            .values()
            .filter(|sub| sub.customer.as_deref() == Some(customer_id))
            .max_by_key(|sub| sub.authorizes_access())
            .cloned())
    }

    async fn find_by_id(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self.get(subscription_id).await)
    }
}

#[async_trait]
impl SubscriptionChangeHandler for InMemorySubscriptionStore {
    async fn on_subscription_changed(
        &self,
        subscription: Subscription,
    ) -> Result<(), DomainError> {
        self.insert(subscription).await;
        Ok(())
    }
}

#[async_trait]
impl InvoiceUpdateHandler for InMemorySubscriptionStore {
    async fn on_invoice_updated(&self, invoice: Invoice) -> Result<(), DomainError> {
        self.invoices
            .write()
            .await
            .insert(invoice.id.clone(), invoice);
        Ok(())
    }
}
