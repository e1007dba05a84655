use crate::error::{Result, StoreError};
use crate::store::{Store, StoreConfig};
use serde_json::Value;
use std::sync::Arc;

/// Hooks a plugin may implement. Every hook defaults to doing nothing.
///
/// Hooks receive the store they are attached to. Plugins should not keep a
/// clone of it, since the store owns its plugins.
pub trait Plugin: Send + Sync {
    /// Unique name within one store.
    fn name(&self) -> &str;

    /// Called once, right after the store is constructed.
    fn init(&self, _store: &Store) {}

    /// Called after `key` was written and its dependents re-derived.
    fn on_set(&self, _store: &Store, _key: &str, _value: &Value) {}

    /// Called after a full `clear`.
    fn on_clear(&self, _store: &Store) {}

    /// Called after `reset` re-applied the defaults.
    fn on_reset(&self, _store: &Store) {}
}

/// Builds plugins for a store under construction.
///
/// Implemented for any `Fn(&Store, &StoreConfig) -> Vec<Arc<dyn Plugin>>`.
pub trait PluginFactory {
    fn build(&self, store: &Store, config: &StoreConfig) -> Vec<Arc<dyn Plugin>>;
}

impl<F> PluginFactory for F
where
    F: Fn(&Store, &StoreConfig) -> Vec<Arc<dyn Plugin>>,
{
    fn build(&self, store: &Store, config: &StoreConfig) -> Vec<Arc<dyn Plugin>> {
        self(store, config)
    }
}

/// Ordered list of installed plugins.
#[derive(Default)]
pub(crate) struct PluginBus {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginBus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a plugin, rejecting a name that is already taken.
    pub(crate) fn register(&mut self, plugin: Arc<dyn Plugin>) -> Result<()> {
        if self.plugins.iter().any(|p| p.name() == plugin.name()) {
            return Err(StoreError::DuplicatePlugin(plugin.name().to_string()));
        }
        self.plugins.push(plugin);
        Ok(())
    }

    /// Snapshot of the plugins, so hooks can run without holding a lock.
    pub(crate) fn plugins(&self) -> Vec<Arc<dyn Plugin>> {
        self.plugins.clone()
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.plugins.iter().map(|p| p.name().to_string()).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.plugins.len()
    }
}
