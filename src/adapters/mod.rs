//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `stripe` - Stripe client and webhook signature verification
//! - `memory` - In-memory subscription store
//! - `http` - axum routes and middleware

pub mod http;
pub mod memory;
pub mod stripe;

pub use memory::InMemorySubscriptionStore;
pub use stripe::StripeClient;
