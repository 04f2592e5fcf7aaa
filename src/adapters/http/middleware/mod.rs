//! HTTP middleware for axum.
//!
//! - `payment_required` - Subscription gate for paid routes

pub mod payment_required;

pub use payment_required::{
    payment_required_middleware, protect, AccessGate, PaymentRequired, RouteConfig,
};
