//! The reactive key-value store.
//!
//! A [`Store`] maps string keys to JSON values. Keys can be derived from the
//! rest of the state, and declared dependencies re-derive them whenever a
//! dependency is written. Subscribers hear about every write to their key,
//! and plugins observe the store lifecycle (`init`, `set`, `reset`, `clear`).
//!
//! # Write protocol
//!
//! Within one `set`:
//!
//! 1. The value (or the derivation's result) is stored.
//! 2. Subscribers of the key are notified.
//! 3. Declared dependency edges are recorded.
//! 4. Dependents are re-derived, in declaration order, recursively.
//! 5. Plugin `set` hooks run in registration order.
//!
//! # Examples
//!
//! ```
//! use pantry::Store;
//! use serde_json::json;
//!
//! let store = Store::new();
//! store
//!     .derive("doubled", &["count"], |state| {
//!         state.get("count").and_then(|v| v.as_i64()).unwrap_or(0) * 2
//!     })
//!     .unwrap();
//!
//! store.set("count", json!(21)).unwrap();
//! assert_eq!(store.get("doubled"), Some(json!(42)));
//! ```

mod builder;
mod config;
mod derivation;
mod pending;
mod reference;
mod store;

pub use builder::StoreBuilder;
pub use config::StoreConfig;
pub use derivation::{Derivation, Input};
pub use pending::PendingWrite;
pub use reference::Ref;
pub use store::{State, Store};
pub(crate) use store::WeakStore;
