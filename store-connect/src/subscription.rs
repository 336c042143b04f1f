//! Store subscriptions
//!
//! A `Subscription` is the unsubscribe capability returned when a listener
//! is registered with a store. Unsubscribing deregisters the listener and
//! clears the subscription, so a second call finds nothing to do.

use parking_lot::Mutex;
use state_store::{same_store, store_id, ChangeListener, SharedStore};

/// An active registration of a listener with a store
///
/// Dropping the subscription unsubscribes.
pub struct Subscription {
    active: Mutex<Option<(SharedStore, ChangeListener)>>,
}

impl Subscription {
    /// Register `listener` with `store`
    pub fn subscribe(store: &SharedStore, listener: ChangeListener) -> Self {
        store.add_change_listener(listener.clone());
        tracing::debug!("Subscribed to store {:#x}", store_id(store));

        Self {
            active: Mutex::new(Some((store.clone(), listener))),
        }
    }

    /// Deregister the listener
    ///
    /// Returns `true` if a registration was removed, `false` if the
    /// subscription was already cleared.
    pub fn unsubscribe(&self) -> bool {
        // Release the lock before calling into the store
        let taken = self.active.lock().take();

        match taken {
            Some((store, listener)) => {
                store.remove_change_listener(&listener);
                tracing::debug!("Unsubscribed from store {:#x}", store_id(&store));
                true
            }
            None => false,
        }
    }

    /// True until the first `unsubscribe()`
    pub fn is_active(&self) -> bool {
        self.active.lock().is_some()
    }

    /// True if this subscription is active on `store`
    pub fn is_subscribed_to(&self, store: &SharedStore) -> bool {
        self.active
            .lock()
            .as_ref()
            .is_some_and(|(current, _)| same_store(current, store))
    }

    /// The store this subscription is active on
    pub fn store(&self) -> Option<SharedStore> {
        self.active.lock().as_ref().map(|(store, _)| store.clone())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
