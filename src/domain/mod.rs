//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (errors)
//! - `billing` - Subscriptions, access policy, and webhook dispatch

pub mod billing;
pub mod foundation;
