//! Subscription record and status.
//!
//! Subscriptions are owned by the billing provider. The local copy is only
//! read (access checks) or handed to a state-update collaborator after a
//! verified webhook, so unknown fields are carried through untouched.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provider-reported subscription status.
///
/// Status strings the provider may add later land in `Unknown` and never
/// grant access.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
    Incomplete,
    IncompleteExpired,
    Unpaid,
    Paused,
    Unknown(String),
}

impl SubscriptionStatus {
    /// Parse a provider status string.
    pub fn parse(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "trialing" => Self::Trialing,
            "past_due" => Self::PastDue,
            "canceled" => Self::Canceled,
            "incomplete" => Self::Incomplete,
            "incomplete_expired" => Self::IncompleteExpired,
            "unpaid" => Self::Unpaid,
            "paused" => Self::Paused,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Convert to the provider status string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Trialing => "trialing",
            Self::PastDue => "past_due",
            Self::Canceled => "canceled",
            Self::Incomplete => "incomplete",
            Self::IncompleteExpired => "incomplete_expired",
            Self::Unpaid => "unpaid",
            Self::Paused => "paused",
            Self::Unknown(raw) => raw,
        }
    }

    /// Returns true if this status authorizes access to paid operations.
    ///
    /// Only `active` and `trialing` qualify. Past-due subscriptions get no
    /// grace period here.
    pub fn authorizes_access(&self) -> bool {
        matches!(self, SubscriptionStatus::Active | SubscriptionStatus::Trialing)
    }
}

impl From<String> for SubscriptionStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<SubscriptionStatus> for String {
    fn from(status: SubscriptionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subscription as the provider renders it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Provider identifier (sub_xxx).
    pub id: String,

    /// Current lifecycle status.
    pub status: SubscriptionStatus,

    /// Owning customer (cus_xxx), when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,

    /// Every other provider-defined field, passed through opaquely.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Subscription {
    pub fn new(id: impl Into<String>, status: SubscriptionStatus) -> Self {
        Self {
            id: id.into(),
            status,
            customer: None,
            extra: Map::new(),
        }
    }

    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    pub fn authorizes_access(&self) -> bool {
        self.status.authorizes_access()
    }
}
