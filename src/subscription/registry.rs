use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

/// A change callback. Receives `None` when the key has no value.
pub type Callback = Arc<dyn Fn(Option<&Value>) + Send + Sync>;

/// Identifies one registration of a callback on one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Ordered subscriber lists, keyed by store key.
///
/// Keys are kept in first-subscription order so that a store-wide broadcast
/// is deterministic.
#[derive(Default)]
pub(crate) struct SubscriberRegistry {
    next_id: u64,
    subscribers: IndexMap<String, Vec<(SubscriberId, Callback)>>,
}

impl SubscriberRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a callback to `key`'s list.
    pub(crate) fn add(&mut self, key: &str, callback: Callback) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers
            .entry(key.to_string())
            .or_default()
            .push((id, callback));
        id
    }

    /// Remove the registration `id` from `key`. Returns whether anything was removed.
    pub(crate) fn remove(&mut self, key: &str, id: SubscriberId) -> bool {
        match self.subscribers.get_mut(key) {
            Some(list) => {
                let before = list.len();
                list.retain(|(existing, _)| *existing != id);
                list.len() != before
            }
            None => false,
        }
    }

    /// Snapshot of `key`'s callbacks, in notification order.
    pub(crate) fn callbacks_for(&self, key: &str) -> Vec<Callback> {
        self.subscribers
            .get(key)
            .map(|list| list.iter().map(|(_, cb)| Arc::clone(cb)).collect())
            .unwrap_or_default()
    }

    /// Keys with at least one subscriber.
    pub(crate) fn subscribed_keys(&self) -> Vec<String> {
        self.subscribers
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub(crate) fn count(&self, key: &str) -> usize {
        self.subscribers.get(key).map_or(0, Vec::len)
    }

    /// Empty `key`'s list without forgetting the key.
    pub(crate) fn empty(&mut self, key: &str) {
        self.subscribers.entry(key.to_string()).or_default().clear();
    }

    pub(crate) fn clear(&mut self) {
        self.subscribers.clear();
    }
}
