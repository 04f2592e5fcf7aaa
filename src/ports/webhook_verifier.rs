//! Webhook verification port.
//!
//! Turns a raw, signed payload into a trusted event. The payload must be the
//! exact bytes received on the wire.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::domain::billing::{SignatureVerificationError, StripeEvent};

#[async_trait]
pub trait WebhookVerifier: Send + Sync {
    /// Verify `payload` against `signature_header` using `endpoint_secret`
    /// and parse it into an event.
    ///
    /// # Errors
    ///
    /// Any malformed header, stale timestamp, signature mismatch or
    /// unparseable envelope yields a `SignatureVerificationError`.
    async fn construct_event(
        &self,
        payload: &[u8],
        signature_header: &str,
        endpoint_secret: &SecretString,
    ) -> Result<StripeEvent, SignatureVerificationError>;

    /// Parse `payload` into an event without any authenticity check.
    ///
    /// Only for endpoints deliberately run without a secret.
    fn parse_unverified(&self, payload: &[u8]) -> Result<StripeEvent, SignatureVerificationError> {
        serde_json::from_slice(payload)
            .map_err(|e| SignatureVerificationError::InvalidPayload(e.to_string()))
    }
}
