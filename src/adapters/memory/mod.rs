//! In-memory adapters.

mod in_memory_subscription_store;

pub use in_memory_subscription_store::{InMemorySubscriptionStore, CUSTOMER_ID_HEADER};
