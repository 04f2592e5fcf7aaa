//! Billing Gate - subscription-gated access and Stripe webhook sync
//!
//! This crate gates protected operations behind an active Stripe
//! subscription and keeps local subscription and invoice state in step with
//! Stripe through signed webhook deliveries.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
