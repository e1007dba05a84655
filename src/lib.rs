//! # Pantry
//!
//! A small reactive key-value store for Rust.
//!
//! Values live under string keys and are plain JSON values. On top of that
//! the store provides:
//!
//! - **Derived keys**: a key can be computed from the whole state by a
//!   [`Derivation`], and re-derived whenever one of its declared
//!   dependencies is written.
//! - **Subscriptions**: per-key callbacks, notified synchronously in
//!   registration order.
//! - **Defaults**: values re-applied by [`Store::reset`].
//! - **Reference handles**: [`Ref`] binds a key so callers need not pass the
//!   store around.
//! - **Pending writes**: [`Store::set_async`] writes the result of a future
//!   once it resolves.
//! - **Plugins**: lifecycle hooks (`init`, `set`, `reset`, `clear`), such as
//!   the bundled [`JsonFilePersistence`].
//!
//! ```
//! use pantry::Store;
//! use serde_json::json;
//!
//! let store = Store::new();
//! let total = store
//!     .derive("total", &["price", "quantity"], |state| {
//!         let price = state.get("price").and_then(|v| v.as_f64()).unwrap_or(0.0);
//!         let quantity = state.get("quantity").and_then(|v| v.as_f64()).unwrap_or(0.0);
//!         price * quantity
//!     })
//!     .unwrap();
//!
//! store.set("price", json!(2.5)).unwrap();
//! store.set("quantity", json!(4)).unwrap();
//! assert_eq!(total.get(), Some(json!(10.0)));
//! ```

pub mod error;
mod graph;
pub mod plugin;
pub mod store;
pub mod subscription;

// Re-export main types for convenience
pub use error::{Result, StoreError};
pub use plugin::{JsonFilePersistence, PersistenceConfig, Plugin, PluginFactory};
pub use store::{
    Derivation, Input, PendingWrite, Ref, State, Store, StoreBuilder, StoreConfig,
};
pub use subscription::{Callback, SubscriberId, Subscription};
