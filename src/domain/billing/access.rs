//! Access policy for payment-gated operations.
//!
//! Pure decision over the caller's current subscription. No caching: every
//! request is evaluated against whatever the lookup returns right now.

use thiserror::Error;

use super::subscription::{Subscription, SubscriptionStatus};

/// Why a caller was refused access to a paid operation.
///
/// Never rendered to the caller; the HTTP layer only says "payment required".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// Caller has no subscription on record.
    #[error("No subscription on record")]
    NoSubscription,

    /// Subscription exists but its status does not authorize access.
    #[error("Subscription status '{0}' does not authorize access")]
    StatusNotAuthorizing(SubscriptionStatus),

    /// Subscription lookup failed; access is denied rather than guessed.
    #[error("Subscription lookup failed: {0}")]
    LookupFailed(String),
}

/// Decide whether a subscription authorizes a paid operation.
///
/// Authorized iff a subscription exists and its status is `active` or
/// `trialing`.
pub fn evaluate_access(subscription: Option<&Subscription>) -> Result<(), AccessDenied> {
    match subscription {
        None => Err(AccessDenied::NoSubscription),
        Some(sub) if sub.authorizes_access() => Ok(()),
        Some(sub) => Err(AccessDenied::StatusNotAuthorizing(sub.status.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn absent_subscription_is_denied() {
        assert_eq!(evaluate_access(None), Err(AccessDenied::NoSubscription));
    }

    #[test]
    fn active_subscription_is_allowed() {
        let sub = Subscription::new("sub_1", SubscriptionStatus::Active);
        assert_eq!(evaluate_access(Some(&sub)), Ok(()));
    }

    #[test]
    fn trialing_subscription_is_allowed() {
        let sub = Subscription::new("sub_1", SubscriptionStatus::Trialing);
        assert_eq!(evaluate_access(Some(&sub)), Ok(()));
    }

    #[test]
    fn past_due_subscription_is_denied_with_status() {
        let sub = Subscription::new("sub_1", SubscriptionStatus::PastDue);
        assert_eq!(
            evaluate_access(Some(&sub)),
            Err(AccessDenied::StatusNotAuthorizing(SubscriptionStatus::PastDue))
        );
    }

    proptest! {
        #[test]
        fn authorized_iff_active_or_trialing(raw in "[a-z_]{0,20}") {
            let sub = Subscription::new("sub_prop", SubscriptionStatus::parse(&raw));
            let allowed = evaluate_access(Some(&sub)).is_ok();
            prop_assert_eq!(allowed, raw == "active" || raw == "trialing");
        }
    }
}
