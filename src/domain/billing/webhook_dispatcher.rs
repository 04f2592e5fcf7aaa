//! Webhook dispatcher - verifies, classifies and applies one delivery.
//!
//! ## Flow
//!
//! 1. Verify the raw payload against the Stripe-Signature header
//! 2. Ignore event types the channel does not handle
//! 3. Look up the local record the event refers to
//! 4. Invoke the channel's state-update collaborator
//!
//! Steps run strictly in that order. Nothing is acted upon unless step 1
//! succeeded for this exact payload and header.
//!
//! ## Permissive mode
//!
//! With no endpoint secret configured, step 1 only parses the payload. A
//! payload that is not an event envelope has nothing to classify and is
//! acknowledged without action.
//! Anyone who can reach the endpoint can then forge events, so running
//! without a secret is an operator decision, logged once at construction.

use std::sync::Arc;

use secrecy::SecretString;

use super::stripe_event::StripeEvent;
use super::webhook_channels::WebhookChannel;
use super::webhook_errors::{SignatureVerificationError, WebhookError};
use crate::ports::{SubscriptionLookup, WebhookVerifier};

/// What happened to a delivery that was acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The state-update collaborator ran.
    Applied { event_id: String },
    /// Event type is not handled by this channel.
    Ignored { event_type: String },
    /// Unsigned payload is not an event envelope; nothing to classify.
    Unclassifiable,
    /// Event refers to a record this deployment does not track.
    RecordNotFound { record_id: Option<String> },
    /// Embedded object did not match the channel's object shape.
    MalformedObject { event_id: String },
}

/// Dispatches verified webhook deliveries for one channel.
pub struct WebhookDispatcher<C: WebhookChannel> {
    verifier: Arc<dyn WebhookVerifier>,
    lookup: Arc<dyn SubscriptionLookup>,
    channel: C,
    endpoint_secret: Option<SecretString>,
}

impl<C: WebhookChannel> WebhookDispatcher<C> {
    /// Creates a dispatcher. `endpoint_secret = None` disables verification.
    pub fn new(
        verifier: Arc<dyn WebhookVerifier>,
        lookup: Arc<dyn SubscriptionLookup>,
        channel: C,
        endpoint_secret: Option<SecretString>,
    ) -> Self {
        if endpoint_secret.is_none() {
            tracing::warn!(
                channel = C::NAME,
                "No webhook endpoint secret configured - signature verification is disabled"
            );
        }

        Self {
            verifier,
            lookup,
            channel,
            endpoint_secret,
        }
    }

    /// Returns true if deliveries are signature-checked.
    pub fn verifies_signatures(&self) -> bool {
        self.endpoint_secret.is_some()
    }

    /// Process one delivery.
    ///
    /// # Returns
    ///
    /// - `Ok(_)` - acknowledge the delivery (200), whatever the outcome
    /// - `Err(WebhookError::Verification)` - reject as inauthentic (400)
    /// - `Err(WebhookError::Collaborator)` - a lookup or state update failed
    pub async fn dispatch(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
    ) -> Result<DispatchOutcome, WebhookError> {
        let event = match &self.endpoint_secret {
            Some(secret) => self
                .verify(payload, signature_header, secret)
                .await
                .map_err(|e| {
                    tracing::warn!(channel = C::NAME, error = %e, "Webhook signature verification failed");
                    e
                })?,
            None => match self.verifier.parse_unverified(payload) {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(
                        channel = C::NAME,
                        error = %e,
                        "Ignoring unsigned webhook payload that is not an event"
                    );
                    return Ok(DispatchOutcome::Unclassifiable);
                }
            },
        };

        if !C::recognizes(&event.event_type) {
            tracing::debug!(
                channel = C::NAME,
                event_id = %event.id,
                event_type = %event.event_type,
                "Ignoring unhandled webhook event type"
            );
            return Ok(DispatchOutcome::Ignored {
                event_type: event.event_type,
            });
        }

        let object: C::Object = match event.deserialize_object() {
            Ok(object) => object,
            Err(e) => {
                tracing::warn!(
                    channel = C::NAME,
                    event_id = %event.id,
                    error = %e,
                    "Webhook event object has unexpected shape"
                );
                return Ok(DispatchOutcome::MalformedObject { event_id: event.id });
            }
        };

        let Some(record_id) = C::local_record_id(&object).map(str::to_string) else {
            tracing::warn!(
                channel = C::NAME,
                event_id = %event.id,
                "Webhook event does not reference a subscription"
            );
            return Ok(DispatchOutcome::RecordNotFound { record_id: None });
        };

        if self.lookup.find_by_id(&record_id).await?.is_none() {
            tracing::warn!(
                channel = C::NAME,
                event_id = %event.id,
                subscription_id = %record_id,
                "Subscription with id {} not found",
                record_id
            );
            return Ok(DispatchOutcome::RecordNotFound {
                record_id: Some(record_id),
            });
        }

        self.channel.apply(object).await?;

        tracing::info!(
            channel = C::NAME,
            event_id = %event.id,
            event_type = %event.event_type,
            subscription_id = %record_id,
            "Webhook event applied"
        );
        Ok(DispatchOutcome::Applied { event_id: event.id })
    }

    async fn verify(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
        endpoint_secret: &SecretString,
    ) -> Result<StripeEvent, SignatureVerificationError> {
        let header = signature_header.ok_or(SignatureVerificationError::MissingHeader)?;
        self.verifier
            .construct_event(payload, header, endpoint_secret)
            .await
    }
}
