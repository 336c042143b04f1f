//! The store contract and an in-memory reference store
//!
//! This module provides:
//! - `Store`: the capability every observable store exposes
//! - `MemoryStore`: a key/value store with change detection that emits
//!   typed change events to its listeners

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::{ListenerError, Result, StoreError};
use crate::event::ChangeEvent;
use crate::value::Value;

/// Callback registered with a store to receive change events
///
/// Listeners are compared by identity, so the same `Arc` must be passed to
/// `remove_change_listener` that was passed to `add_change_listener`.
pub type ChangeListener =
    Arc<dyn Fn(&ChangeEvent) -> std::result::Result<(), ListenerError> + Send + Sync>;

/// Build a `ChangeListener` from a closure
pub fn listener<F>(f: F) -> ChangeListener
where
    F: Fn(&ChangeEvent) -> std::result::Result<(), ListenerError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A store shared between its owner and any number of observers
pub type SharedStore = Arc<dyn Store>;

/// An observable store
///
/// Reads are synchronous and side-effect free from the reader's
/// perspective. Listener registration is synchronous as well.
pub trait Store: Send + Sync + 'static {
    /// Read the value under `key`
    fn get(&self, key: &str) -> Option<Value>;

    /// Register a change listener
    fn add_change_listener(&self, listener: ChangeListener);

    /// Deregister a change listener; unknown listeners are ignored
    fn remove_change_listener(&self, listener: &ChangeListener);

    /// Concrete store access for methods written against a store type
    fn as_any(&self) -> &dyn Any;
}

/// Identity key of a shared store
pub fn store_id(store: &SharedStore) -> usize {
    Arc::as_ptr(store) as *const () as usize
}

/// True if both handles refer to the same store
pub fn same_store(a: &SharedStore, b: &SharedStore) -> bool {
    store_id(a) == store_id(b)
}

/// True if both handles refer to the same listener
pub fn same_listener(a: &ChangeListener, b: &ChangeListener) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory store with change detection
///
/// `set` only emits a change event when the stored value actually changes.
/// The event's type is the key that changed; `set_many` emits a single
/// event tagged with every key that changed.
///
/// # Example
///
/// ```rust
/// use state_store::{listener, MemoryStore, Store, Value};
///
/// let store = MemoryStore::new();
/// let listener = listener(|event| {
///     println!("changed: {:?}", event.change_type);
///     Ok(())
/// });
/// store.add_change_listener(listener.clone());
///
/// assert!(store.set("volume", 50).unwrap());
/// assert!(!store.set("volume", 50).unwrap());
/// assert_eq!(store.get("volume"), Some(Value::from(50)));
///
/// store.remove_change_listener(&listener);
/// assert_eq!(store.listener_count(), 0);
/// ```
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
    listeners: Mutex<Vec<ChangeListener>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Create a store pre-populated with values, without emitting events
    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let store = Self::new();
        {
            let mut map = store.values.write();
            for (key, value) in values {
                map.insert(key.into(), value.into());
            }
        }
        store
    }

    /// Set a value, returning whether it changed
    ///
    /// Listener failures are reported after the value has been stored.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Result<bool> {
        let key = key.into();
        let value = value.into();

        let changed = {
            let mut values = self.values.write();
            if values.get(&key) != Some(&value) {
                values.insert(key.clone(), value);
                true
            } else {
                false
            }
        };

        if changed {
            self.emit(&ChangeEvent::new(key))?;
        }
        Ok(changed)
    }

    /// Set several values, emitting one event for all keys that changed
    ///
    /// Returns the changed keys in input order.
    pub fn set_many<K, V>(&self, entries: impl IntoIterator<Item = (K, V)>) -> Result<Vec<String>>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let changed: Vec<String> = {
            let mut values = self.values.write();
            entries
                .into_iter()
                .filter_map(|(key, value)| {
                    let key = key.into();
                    let value = value.into();
                    if values.get(&key) != Some(&value) {
                        values.insert(key.clone(), value);
                        Some(key)
                    } else {
                        None
                    }
                })
                .collect()
        };

        if !changed.is_empty() {
            self.emit(&ChangeEvent::new(changed.clone()))?;
        }
        Ok(changed)
    }

    /// Remove a value, returning whether it existed
    pub fn remove(&self, key: &str) -> Result<bool> {
        let removed = self.values.write().remove(key).is_some();
        if removed {
            self.emit(&ChangeEvent::new(key))?;
        }
        Ok(removed)
    }

    /// Deliver an event to every registered listener
    ///
    /// The listener list is snapshotted before dispatch, so listeners may
    /// read the store and deregister themselves. Every listener runs even
    /// if an earlier one fails; the first failure is returned.
    pub fn emit(&self, event: &ChangeEvent) -> Result<()> {
        let listeners: Vec<ChangeListener> = self.listeners.lock().clone();
        tracing::trace!(
            "Emitting {:?} to {} listener(s)",
            event.change_type,
            listeners.len()
        );

        let mut first_error = None;
        for listener in listeners {
            if let Err(e) = listener(event) {
                tracing::warn!("Change listener failed for {:?}: {}", event.change_type, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(StoreError::Listener(e)),
            None => Ok(()),
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// All keys currently stored
    pub fn keys(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    fn add_change_listener(&self, listener: ChangeListener) {
        let mut listeners = self.listeners.lock();
        if !listeners.iter().any(|l| same_listener(l, &listener)) {
            listeners.push(listener);
        }
    }

    fn remove_change_listener(&self, listener: &ChangeListener) {
        self.listeners.lock().retain(|l| !same_listener(l, listener));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("value_count", &self.len())
            .field("listener_count", &self.listener_count())
            .finish()
    }
}
