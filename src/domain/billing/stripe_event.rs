//! Stripe webhook event types.
//!
//! Defines the envelope a webhook payload becomes once verified, and the
//! event types each webhook channel reacts to.

use serde::{Deserialize, Serialize};

/// Stripe webhook event envelope.
///
/// Only constructed from a payload whose signature has been checked (or, in
/// permissive mode, from a payload the operator chose not to verify).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "customer.subscription.updated").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    #[serde(default)]
    pub created: i64,

    /// Object containing event-specific data.
    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,

    /// API version used to render this event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,

    /// Previous values for updated attributes (only for update events).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<serde_json::Value>,
}

impl StripeEvent {
    /// Returns true if this is a live mode event.
    pub fn is_live(&self) -> bool {
        self.livemode
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }
}

/// Subscription lifecycle events handled by the subscriptions channel.
///
/// All four variants lead to the same local action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionEventType {
    Created,
    Updated,
    Deleted,
    TrialWillEnd,
}

impl SubscriptionEventType {
    /// Parse a Stripe event type string. Returns `None` for anything this
    /// channel ignores.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "customer.subscription.created" => Some(Self::Created),
            "customer.subscription.updated" => Some(Self::Updated),
            "customer.subscription.deleted" => Some(Self::Deleted),
            "customer.subscription.trial_will_end" => Some(Self::TrialWillEnd),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "customer.subscription.created",
            Self::Updated => "customer.subscription.updated",
            Self::Deleted => "customer.subscription.deleted",
            Self::TrialWillEnd => "customer.subscription.trial_will_end",
        }
    }
}

/// Invoice events handled by the invoices channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceEventType {
    Updated,
}

impl InvoiceEventType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "invoice.updated" => Some(Self::Updated),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Updated => "invoice.updated",
        }
    }
}

/// Builder for creating test StripeEvent instances.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    object: serde_json::Value,
    livemode: bool,
}

#[cfg(test)]
impl Default for StripeEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "customer.subscription.updated".to_string(),
            object: serde_json::json!({}),
            livemode: false,
        }
    }
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn livemode(mut self, livemode: bool) -> Self {
        self.livemode = livemode;
        self
    }

    pub fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: chrono::Utc::now().timestamp(),
            data: StripeEventData {
                object: self.object,
                previous_attributes: None,
            },
            livemode: self.livemode,
            api_version: Some("2024-06-20".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::Subscription;
    use serde_json::json;

    // ══════════════════════════════════════════════════════════════
    // StripeEvent Deserialization Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn deserialize_minimal_event() {
        let json = r#"{
            "id": "evt_1234567890",
            "type": "customer.subscription.created",
            "data": { "object": {} }
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, "evt_1234567890");
        assert_eq!(event.event_type, "customer.subscription.created");
        assert_eq!(event.created, 0);
        assert!(!event.is_live());
        assert!(event.api_version.is_none());
    }

    #[test]
    fn deserialize_event_with_previous_attributes() {
        let json = r#"{
            "id": "evt_update_123",
            "type": "customer.subscription.updated",
            "created": 1704067200,
            "data": {
                "object": {"id": "sub_1", "status": "active"},
                "previous_attributes": {"status": "past_due"}
            },
            "livemode": true,
            "api_version": "2023-10-16"
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();

        assert!(event.is_live());
        let prev = event.data.previous_attributes.unwrap();
        assert_eq!(prev["status"], "past_due");
    }

    #[test]
    fn missing_data_is_rejected() {
        let json = r#"{"id": "evt_1", "type": "invoice.updated"}"#;
        assert!(serde_json::from_str::<StripeEvent>(json).is_err());
    }

    #[test]
    fn deserialize_object_to_subscription() {
        let event = StripeEventBuilder::new()
            .object(json!({"id": "sub_abc", "status": "canceled"}))
            .build();

        let sub: Subscription = event.deserialize_object().unwrap();
        assert_eq!(sub.id, "sub_abc");
        assert!(!sub.authorizes_access());
    }

    // ══════════════════════════════════════════════════════════════
    // Event Type Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn subscription_channel_recognizes_lifecycle_events() {
        for event_type in [
            SubscriptionEventType::Created,
            SubscriptionEventType::Updated,
            SubscriptionEventType::Deleted,
            SubscriptionEventType::TrialWillEnd,
        ] {
            assert_eq!(
                SubscriptionEventType::parse(event_type.as_str()),
                Some(event_type)
            );
        }
    }

    #[test]
    fn subscription_channel_ignores_other_events() {
        assert_eq!(SubscriptionEventType::parse("customer.subscription.paused"), None);
        assert_eq!(SubscriptionEventType::parse("invoice.updated"), None);
        assert_eq!(SubscriptionEventType::parse(""), None);
    }

    #[test]
    fn invoice_channel_recognizes_only_updated() {
        assert_eq!(
            InvoiceEventType::parse("invoice.updated"),
            Some(InvoiceEventType::Updated)
        );
        assert_eq!(InvoiceEventType::parse("invoice.paid"), None);
        assert_eq!(InvoiceEventType::parse("customer.subscription.updated"), None);
    }
}
