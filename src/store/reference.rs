use super::{Input, Store};
use crate::error::Result;
use crate::subscription::Subscription;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A handle bound to one key of a store.
///
/// Every method delegates to the store with the bound key. Handles carry no
/// state of their own: two handles for the same key of the same store are
/// equal and interchangeable.
///
/// # Examples
///
/// ```
/// use pantry::Store;
/// use serde_json::json;
///
/// let store = Store::new();
/// let theme = store.set("theme", json!("dark")).unwrap();
///
/// theme.set(json!("light")).unwrap();
/// assert_eq!(store.get("theme"), Some(json!("light")));
/// assert_eq!(theme, store.reference("theme"));
/// ```
#[derive(Clone)]
pub struct Ref {
    store: Store,
    key: String,
}

impl Ref {
    pub(crate) fn new(store: Store, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn get(&self) -> Option<Value> {
        self.store.get(&self.key)
    }

    pub fn get_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.store.get_as(&self.key)
    }

    pub fn set(&self, input: impl Into<Input>) -> Result<Ref> {
        self.store.set(&self.key, input)
    }

    pub fn set_with_deps(&self, input: impl Into<Input>, deps: &[&str]) -> Result<Ref> {
        self.store.set_with_deps(&self.key, input, deps)
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&Value>) + Send + Sync + 'static,
    {
        self.store.subscribe(&self.key, callback)
    }

    pub fn subscribe_deferred<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&Value>) + Send + Sync + 'static,
    {
        self.store.subscribe_deferred(&self.key, callback)
    }
}

impl PartialEq for Ref {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.store.same_store(&other.store)
    }
}

impl Eq for Ref {}

impl std::fmt::Debug for Ref {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ref")
            .field("store", &self.store.id())
            .field("key", &self.key)
            .finish()
    }
}
