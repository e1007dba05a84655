//! Per-key change notification.
//!
//! Subscribers are plain callbacks receiving the key's current value, or
//! `None` when the key is absent. They are notified in registration order.

mod handle;
mod registry;

pub use handle::Subscription;
pub(crate) use registry::SubscriberRegistry;
pub use registry::{Callback, SubscriberId};
