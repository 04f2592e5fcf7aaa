//! Webhook error types for Stripe webhook handling.
//!
//! Only two things can go wrong from the sender's point of view: the
//! delivery is not authentic (400, never retried into success) or a local
//! collaborator failed (surfaced as 500).

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::DomainError;

/// Reasons a webhook envelope failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureVerificationError {
    /// No Stripe-Signature header on the request.
    #[error("Missing Stripe-Signature header")]
    MissingHeader,

    /// Header present but not in `t=...,v1=...` form.
    #[error("Malformed signature header: {0}")]
    MalformedHeader(String),

    /// Signature timestamp is outside the tolerance window.
    #[error("Timestamp outside the tolerance zone")]
    TimestampOutOfTolerance,

    /// No v1 signature matched the expected HMAC.
    #[error("No signatures found matching the expected signature for payload")]
    NoMatchingSignature,

    /// Signature matched but the body is not a valid event envelope.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

/// Errors that end webhook processing with a non-2xx response.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Webhook failed authenticity checks.
    #[error("Signature verification failed: {0}")]
    Verification(#[from] SignatureVerificationError),

    /// A lookup or state-update collaborator failed.
    #[error("Collaborator failed: {0}")]
    Collaborator(#[from] DomainError),
}

impl WebhookError {
    /// Maps the error to an HTTP status code.
    ///
    /// - 400: authenticity failure, Stripe will not be told to redeliver a forgery
    /// - 500: local failure, Stripe retries the delivery
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::Verification(_) => StatusCode::BAD_REQUEST,
            WebhookError::Collaborator(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_header_displays_correctly() {
        let err = SignatureVerificationError::MissingHeader;
        assert_eq!(format!("{}", err), "Missing Stripe-Signature header");
    }

    #[test]
    fn invalid_payload_displays_reason() {
        let err = SignatureVerificationError::InvalidPayload("expected value".to_string());
        assert_eq!(format!("{}", err), "Invalid payload: expected value");
    }

    #[test]
    fn every_verification_failure_returns_bad_request() {
        for err in [
            SignatureVerificationError::MissingHeader,
            SignatureVerificationError::MalformedHeader("no t".to_string()),
            SignatureVerificationError::TimestampOutOfTolerance,
            SignatureVerificationError::NoMatchingSignature,
            SignatureVerificationError::InvalidPayload("eof".to_string()),
        ] {
            assert_eq!(WebhookError::from(err).status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn collaborator_failure_returns_internal_error() {
        let err = WebhookError::from(DomainError::database("connection lost"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
