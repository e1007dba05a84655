//! Lifecycle plugins.
//!
//! A plugin observes the store through four hooks: `init` once after
//! construction, `on_set` after every write, `on_reset` after every reset
//! and `on_clear` after a full clear. Plugins are built by factories handed
//! to [`StoreBuilder::plugin`](crate::StoreBuilder::plugin) and run in
//! registration order.

mod bus;
mod persistence;

pub(crate) use bus::PluginBus;
pub use bus::{Plugin, PluginFactory};
pub use persistence::{JsonFilePersistence, PersistenceConfig};
