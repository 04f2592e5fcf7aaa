//! Stripe provider adapter.
//!
//! - `StripeClient` - the single configured client (API calls, webhook verification)
//! - `signature` - Stripe-Signature header parsing and HMAC checks
//!
//! # Security
//!
//! - Webhook signatures use HMAC-SHA256 with constant-time comparison
//! - Timestamps are validated to prevent replay attacks (5-minute window)
//! - All secrets are handled via `secrecy::SecretString`

mod client;
mod signature;

pub use client::StripeClient;
pub use signature::{generate_test_header, verify_signature, SignatureHeader};
