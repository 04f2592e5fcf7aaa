//! Subscription lookup port.
//!
//! One collaborator serves both the access gate and the webhook dispatchers.
//! The contract is the same for both entry points:
//!
//! - `Ok(Some(_))` - a local record exists
//! - `Ok(None)` - no local record (not an error)
//! - `Err(_)` - the store itself failed
//!
//! # Example
//!
//! ```ignore
//! async fn caller_can_export(lookup: &dyn SubscriptionLookup, parts: &Parts) -> bool {
//!     matches!(lookup.find_for_request(parts).await, Ok(Some(sub)) if sub.authorizes_access())
//! }
//! ```

use async_trait::async_trait;
use http::request::Parts;

use crate::domain::billing::Subscription;
use crate::domain::foundation::DomainError;

/// Reads locally mirrored subscription records.
#[async_trait]
pub trait SubscriptionLookup: Send + Sync {
    /// Find the subscription belonging to the caller of an inbound request.
    ///
    /// How the caller is identified (session, header, extension inserted by
    /// an auth layer) is up to the implementation.
    async fn find_for_request(&self, request: &Parts)
        -> Result<Option<Subscription>, DomainError>;

    /// Find a subscription by its provider identifier.
    async fn find_by_id(&self, subscription_id: &str)
        -> Result<Option<Subscription>, DomainError>;
}
