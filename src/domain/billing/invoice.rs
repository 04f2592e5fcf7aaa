//! Invoice record as delivered in invoice webhooks.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A provider invoice.
///
/// Only the fields needed to route the event are typed; the rest is opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Provider identifier (in_xxx).
    pub id: String,

    /// Invoice status (draft, open, paid, uncollectible, void).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Subscription this invoice bills, absent for one-off invoices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Invoice {
    /// Subscription this invoice bills.
    ///
    /// Newer API versions drop the top-level field in favour of
    /// `parent.subscription_details.subscription`.
    pub fn subscription_id(&self) -> Option<&str> {
        self.subscription.as_deref().or_else(|| {
            self.extra
                .get("parent")?
                .get("subscription_details")?
                .get("subscription")?
                .as_str()
        })
    }
}
