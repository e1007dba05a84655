use super::{Store, StoreConfig};
use crate::error::Result;
use crate::plugin::{PluginBus, PluginFactory};
use tracing::debug;

/// Builder for a [`Store`] with configuration and plugins.
///
/// # Examples
///
/// ```
/// use pantry::{Plugin, Store, StoreConfig};
/// use std::sync::Arc;
///
/// struct Audit;
///
/// impl Plugin for Audit {
///     fn name(&self) -> &str {
///         "audit"
///     }
/// }
///
/// let store = Store::builder()
///     .id("settings")
///     .plugin(|_: &Store, _: &StoreConfig| vec![Arc::new(Audit) as Arc<dyn Plugin>])
///     .build()
///     .unwrap();
///
/// assert_eq!(store.plugin_names(), vec!["audit".to_string()]);
/// ```
#[derive(Default)]
pub struct StoreBuilder {
    config: StoreConfig,
    factories: Vec<Box<dyn PluginFactory>>,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.config.id = Some(id.into());
        self
    }

    /// Add a plugin factory. Factories run in the order they are added.
    pub fn plugin(mut self, factory: impl PluginFactory + 'static) -> Self {
        self.factories.push(Box::new(factory));
        self
    }

    /// Construct the store, assemble the plugin bus and run every `init` hook.
    ///
    /// Fails with [`StoreError::DuplicatePlugin`](crate::StoreError::DuplicatePlugin)
    /// when two plugins share a name.
    pub fn build(self) -> Result<Store> {
        let store = Store::with_config(self.config);

        let mut bus = PluginBus::new();
        for factory in &self.factories {
            for plugin in factory.build(&store, store.config()) {
                bus.register(plugin)?;
            }
        }
        debug!(store = store.label(), plugins = bus.len(), "store constructed");
        store.install_plugins(bus);

        for plugin in store.plugins() {
            debug!(store = store.label(), plugin = plugin.name(), "plugin init");
            plugin.init(&store);
        }

        Ok(store)
    }
}
