//! Stripe-Signature header parsing and HMAC-SHA256 checks.
//!
//! The signed payload is `"{timestamp}.{raw body}"`, computed over the exact
//! request bytes. The body is never decoded before the signature matches.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::billing::SignatureVerificationError;

type HmacSha256 = Hmac<Sha256>;

/// Allowed clock skew for timestamps in the future.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components from the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// v1 signatures (HMAC-SHA256). Several are sent while a secret is rolled.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v1=<signature>...][,v0=<legacy>]`
    pub fn parse(header: &str) -> Result<Self, SignatureVerificationError> {
        let header = header.trim();
        if header.is_empty() {
            return Err(SignatureVerificationError::MissingHeader);
        }

        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                SignatureVerificationError::MalformedHeader("invalid header format".to_string())
            })?;

            match key.trim() {
                "t" => {
                    timestamp = Some(value.trim().parse().map_err(|_| {
                        SignatureVerificationError::MalformedHeader(
                            "invalid timestamp".to_string(),
                        )
                    })?);
                }
                "v1" => {
                    // Stripe skips v1 entries it cannot decode; so do we.
                    if let Ok(sig) = hex::decode(value.trim()) {
                        v1_signatures.push(sig);
                    }
                }
                _ => {
                    // v0 and unknown schemes are ignored
                }
            }
        }

        let timestamp = timestamp.ok_or_else(|| {
            SignatureVerificationError::MalformedHeader("missing timestamp".to_string())
        })?;
        if v1_signatures.is_empty() {
            return Err(SignatureVerificationError::MalformedHeader(
                "no v1 signatures found".to_string(),
            ));
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
        })
    }
}

/// Checks a raw payload against a parsed header.
///
/// `now` and `tolerance_secs` are explicit so callers control the clock.
pub fn verify_signature(
    payload: &[u8],
    header: &SignatureHeader,
    secret: &str,
    now: i64,
    tolerance_secs: i64,
) -> Result<(), SignatureVerificationError> {
    let expected = compute_signature(secret, header.timestamp, payload)
        .ok_or(SignatureVerificationError::NoMatchingSignature)?;

    if !header
        .v1_signatures
        .iter()
        .any(|candidate| constant_time_compare(&expected, candidate))
    {
        return Err(SignatureVerificationError::NoMatchingSignature);
    }

    let age = now.saturating_sub(header.timestamp);
    if tolerance_secs > 0 && (age > tolerance_secs || age < -MAX_CLOCK_SKEW_SECS) {
        return Err(SignatureVerificationError::TimestampOutOfTolerance);
    }

    Ok(())
}

/// Builds a Stripe-Signature header value for a payload.
///
/// Used by tests and local tooling to simulate provider deliveries.
pub fn generate_test_header(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let signature = compute_signature(secret, timestamp, payload)
        .map(hex::encode)
        .unwrap_or_default();
    format!("t={},v1={}", timestamp, signature)
}

fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Some(mac.finalize().into_bytes().to_vec())
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
