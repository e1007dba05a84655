use super::{Derivation, Input, PendingWrite, Ref, StoreBuilder, StoreConfig};
use crate::error::{Result, StoreError};
use crate::graph::DependencyGraph;
use crate::plugin::{Plugin, PluginBus};
use crate::subscription::{Callback, SubscriberId, SubscriberRegistry, Subscription};
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

/// The full key→value mapping, in insertion order.
pub type State = IndexMap<String, Value>;

#[derive(Default)]
struct Values {
    state: State,
    // Kept in first-registration order; `reset` replays them in that order.
    defaults: IndexMap<String, Input>,
    derivations: HashMap<String, Derivation>,
}

struct StoreInner {
    config: StoreConfig,
    values: RwLock<Values>,
    graph: RwLock<DependencyGraph>,
    subscribers: Mutex<SubscriberRegistry>,
    plugins: RwLock<PluginBus>,
}

/// A reactive key-value store.
///
/// `Store` is a cheap handle over shared state; clones refer to the same
/// store. No lock is held while derivations, subscribers or plugin hooks
/// run, so they may call back into the store.
///
/// The dependency graph is expected to be acyclic. A cycle is detected while
/// propagating and reported as [`StoreError::CyclicDependency`].
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Create a store without plugins.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    pub(crate) fn with_config(config: StoreConfig) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                config,
                values: RwLock::new(Values::default()),
                graph: RwLock::new(DependencyGraph::new()),
                subscribers: Mutex::new(SubscriberRegistry::new()),
                plugins: RwLock::new(PluginBus::new()),
            }),
        }
    }

    pub(crate) fn install_plugins(&self, bus: PluginBus) {
        *self.inner.plugins.write() = bus;
    }

    pub(crate) fn plugins(&self) -> Vec<Arc<dyn Plugin>> {
        self.inner.plugins.read().plugins()
    }

    pub(crate) fn downgrade(&self) -> WeakStore {
        WeakStore(Arc::downgrade(&self.inner))
    }

    pub(crate) fn label(&self) -> &str {
        self.inner.config.id.as_deref().unwrap_or("anonymous")
    }

    pub fn id(&self) -> Option<&str> {
        self.inner.config.id.as_deref()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Names of the installed plugins, in registration order.
    pub fn plugin_names(&self) -> Vec<String> {
        self.inner.plugins.read().names()
    }

    /// Get the current value of `key`, or `None` if it has none.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.values.read().state.get(key).cloned()
    }

    /// Get the value of `key` decoded into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get(key)
            .map(|value| {
                serde_json::from_value(value).map_err(|source| StoreError::Decode {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Snapshot of the whole state.
    pub fn state(&self) -> State {
        self.inner.values.read().state.clone()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.values.read().state.contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.values.read().state.keys().cloned().collect()
    }

    /// Replace the whole state without notifying subscribers or plugins.
    ///
    /// Meant for plugins restoring persisted state during `init`.
    pub fn replace_state(&self, state: State) {
        self.inner.values.write().state = state;
    }

    /// A handle bound to `key`.
    pub fn reference(&self, key: &str) -> Ref {
        Ref::new(self.clone(), key)
    }

    /// Write `input` under `key` and propagate the change.
    pub fn set(&self, key: &str, input: impl Into<Input>) -> Result<Ref> {
        self.set_with_deps(key, input, &[])
    }

    /// Write `input` under `key`, declaring that `key` depends on each of `deps`.
    ///
    /// Once declared, a write to any of `deps` re-runs the derivation
    /// registered for `key`.
    pub fn set_with_deps(&self, key: &str, input: impl Into<Input>, deps: &[&str]) -> Result<Ref> {
        let mut chain = Vec::new();
        self.write(key, input.into(), deps, &mut chain)?;
        Ok(self.reference(key))
    }

    /// Register `f` as the derivation of `key` and re-run it whenever one of
    /// `deps` is written.
    pub fn derive<F, V>(&self, key: &str, deps: &[&str], f: F) -> Result<Ref>
    where
        F: Fn(&State) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        self.set_with_deps(key, Derivation::new(f), deps)
    }

    /// Write the result of `future` under `key` once it resolves.
    ///
    /// Returns immediately. The write happens on the ambient tokio runtime
    /// and only when the future succeeds; the returned [`PendingWrite`]
    /// reports the outcome and can abort the write. Overlapping pending
    /// writes for the same key are not ordered: the last to finish wins.
    pub fn set_async<F, V, E>(&self, key: &str, future: F, deps: &[&str]) -> Result<(Ref, PendingWrite)>
    where
        F: Future<Output = std::result::Result<V, E>> + Send + 'static,
        V: Into<Input> + Send + 'static,
        E: Into<anyhow::Error> + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| StoreError::NoRuntime)?;

        let store = self.clone();
        let owned_key = key.to_string();
        let deps: Vec<String> = deps.iter().map(|dep| dep.to_string()).collect();

        let handle = runtime.spawn(async move {
            let value = future.await.map_err(|err| StoreError::AsyncResolution {
                key: owned_key.clone(),
                source: err.into(),
            })?;
            let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
            store.set_with_deps(&owned_key, value, &deps).map(|_| ())
        });

        trace!(store = self.label(), key, "pending write scheduled");
        Ok((self.reference(key), PendingWrite::new(key, handle)))
    }

    /// Record a default for `key`, and write it if `key` has no value yet.
    ///
    /// An existing value is left untouched. Defaults are re-applied by
    /// [`reset`](Self::reset).
    pub fn set_default(&self, key: &str, input: impl Into<Input>) -> Result<Ref> {
        let input = input.into();
        let already_set = {
            let mut values = self.inner.values.write();
            values.defaults.insert(key.to_string(), input.clone());
            values.state.contains_key(key)
        };

        if already_set {
            Ok(self.reference(key))
        } else {
            self.set(key, input)
        }
    }

    /// Drop all values, re-apply the defaults, run plugin `reset` hooks and
    /// notify every subscribed key.
    pub fn reset(&self) -> Result<()> {
        let defaults: Vec<(String, Input)> = {
            let mut values = self.inner.values.write();
            values.state.clear();
            values
                .defaults
                .iter()
                .map(|(key, input)| (key.clone(), input.clone()))
                .collect()
        };
        debug!(store = self.label(), defaults = defaults.len(), "resetting store");

        for (key, input) in defaults {
            self.set(&key, input)?;
        }
        for plugin in self.plugins() {
            plugin.on_reset(self);
        }
        self.broadcast_all();
        Ok(())
    }

    /// Drop every subscriber, [`reset`](Self::reset) the store, then run
    /// plugin `clear` hooks.
    pub fn clear(&self) -> Result<()> {
        debug!(store = self.label(), "clearing store");
        self.inner.subscribers.lock().clear();
        self.reset()?;
        for plugin in self.plugins() {
            plugin.on_clear(self);
        }
        Ok(())
    }

    /// Remove the value of `key` and empty its subscriber list.
    ///
    /// The list is emptied before the key is broadcast, so the removed
    /// subscribers are not told about the removal.
    pub fn clear_key(&self, key: &str) {
        self.inner.values.write().state.shift_remove(key);
        self.inner.subscribers.lock().empty(key);
        self.broadcast(key);
    }

    /// Subscribe to `key`. If it has a value, `callback` is called with it
    /// before this returns.
    pub fn subscribe<F>(&self, key: &str, callback: F) -> Subscription
    where
        F: Fn(Option<&Value>) + Send + Sync + 'static,
    {
        self.add_subscriber(key, Arc::new(callback), true)
    }

    /// Subscribe to `key` without the immediate call.
    pub fn subscribe_deferred<F>(&self, key: &str, callback: F) -> Subscription
    where
        F: Fn(Option<&Value>) + Send + Sync + 'static,
    {
        self.add_subscriber(key, Arc::new(callback), false)
    }

    fn add_subscriber(&self, key: &str, callback: Callback, immediate: bool) -> Subscription {
        let id = self.inner.subscribers.lock().add(key, Arc::clone(&callback));
        trace!(store = self.label(), key, ?id, "subscribed");

        if immediate {
            if let Some(value) = self.get(key) {
                callback(Some(&value));
            }
        }
        Subscription::new(key, id, self.downgrade())
    }

    /// Remove one registration. Returns whether it was still registered.
    pub fn unsubscribe(&self, key: &str, id: SubscriberId) -> bool {
        self.inner.subscribers.lock().remove(key, id)
    }

    pub fn subscriber_count(&self, key: &str) -> usize {
        self.inner.subscribers.lock().count(key)
    }

    /// Call every subscriber of `key` with its current value.
    pub fn broadcast(&self, key: &str) {
        let callbacks = self.inner.subscribers.lock().callbacks_for(key);
        if callbacks.is_empty() {
            return;
        }

        let value = self.get(key);
        trace!(store = self.label(), key, subscribers = callbacks.len(), "broadcast");
        for callback in callbacks {
            callback(value.as_ref());
        }
    }

    /// Broadcast every key that has at least one subscriber.
    pub fn broadcast_all(&self) {
        let keys = self.inner.subscribers.lock().subscribed_keys();
        for key in keys {
            self.broadcast(&key);
        }
    }

    fn write(&self, key: &str, input: Input, deps: &[&str], chain: &mut Vec<String>) -> Result<()> {
        let value = match input {
            Input::Value(value) => value,
            Input::Derived(derivation) => {
                self.inner
                    .values
                    .write()
                    .derivations
                    .insert(key.to_string(), derivation.clone());
                self.evaluate(key, &derivation)?
            }
        };

        self.inner
            .values
            .write()
            .state
            .insert(key.to_string(), value.clone());
        trace!(store = self.label(), key, "value stored");

        self.broadcast(key);

        if !deps.is_empty() {
            let mut graph = self.inner.graph.write();
            for dep in deps {
                graph.add_dependency(dep, key);
            }
        }

        self.propagate(key, chain)?;

        for plugin in self.plugins() {
            plugin.on_set(self, key, &value);
        }
        Ok(())
    }

    /// Re-derive every dependent of `key`. `chain` holds the keys currently
    /// being propagated; reaching one of them again is a cycle.
    fn propagate(&self, key: &str, chain: &mut Vec<String>) -> Result<()> {
        let dependents = self.inner.graph.read().dependents_of(key);
        if dependents.is_empty() {
            return Ok(());
        }

        chain.push(key.to_string());
        let result = dependents
            .iter()
            .try_for_each(|dependent| self.recompute(dependent, chain));
        chain.pop();
        result
    }

    fn recompute(&self, key: &str, chain: &mut Vec<String>) -> Result<()> {
        if chain.iter().any(|visiting| visiting == key) {
            let mut chain = chain.clone();
            chain.push(key.to_string());
            return Err(StoreError::CyclicDependency {
                key: key.to_string(),
                chain,
            });
        }

        let derivation = self.inner.values.read().derivations.get(key).cloned();
        let Some(derivation) = derivation else {
            trace!(store = self.label(), key, "dependent has no derivation, skipped");
            return Ok(());
        };

        trace!(store = self.label(), key, depth = chain.len(), "re-deriving");
        let value = self.evaluate(key, &derivation)?;
        self.write(key, Input::Value(value), &[], chain)
    }

    fn evaluate(&self, key: &str, derivation: &Derivation) -> Result<Value> {
        let state = self.state();
        derivation
            .compute(&state)
            .map_err(|source| StoreError::Derivation {
                key: key.to_string(),
                source,
            })
    }

    pub(crate) fn same_store(&self, other: &Store) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.id())
            .field("keys", &self.keys())
            .field("plugins", &self.plugin_names())
            .finish()
    }
}

/// Non-owning store handle, used by subscriptions.
#[derive(Clone)]
pub(crate) struct WeakStore(Weak<StoreInner>);

impl WeakStore {
    pub(crate) fn upgrade(&self) -> Option<Store> {
        self.0.upgrade().map(|inner| Store { inner })
    }
}
