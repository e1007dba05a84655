use super::SubscriberId;
use crate::store::WeakStore;

/// Handle returned by `subscribe`, used to remove that one registration.
///
/// Holds only a weak reference to the store, so keeping a subscription
/// around does not keep the store alive. Dropping it does not unsubscribe.
pub struct Subscription {
    key: String,
    id: SubscriberId,
    store: WeakStore,
}

impl Subscription {
    pub(crate) fn new(key: &str, id: SubscriberId, store: WeakStore) -> Self {
        Self {
            key: key.to_string(),
            id,
            store,
        }
    }

    /// The key this subscription listens to.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Remove the callback from the store.
    ///
    /// Calling this more than once, or after the store is gone, has no effect.
    pub fn unsubscribe(&self) {
        if let Some(store) = self.store.upgrade() {
            store.unsubscribe(&self.key, self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("id", &self.id)
            .finish()
    }
}
