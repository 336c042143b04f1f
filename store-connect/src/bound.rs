//! Store-scoped cache of bound methods
//!
//! Projecting a store method hands the component a `BoundMethod`. Building
//! a fresh binding on every render would change its identity each time and
//! defeat memoization in the wrapped component, so bindings are cached per
//! store identity and per method identity.
//!
//! ```text
//! BoundMethodCache
//!     └── slots: HashMap<store_id, StoreSlot>
//!             ├── store: Weak<dyn Store>
//!             └── methods: HashMap<method_id, WeakBoundMethod>
//! ```
//!
//! The cache owns nothing. Stores are held weakly, and so are bindings: a
//! binding stays cached while some rendered element still holds it, which
//! is exactly when a component can compare it against the next render.
//! Dead slots and dead bindings are pruned on every `bind()`.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Weak};

use parking_lot::Mutex;
use state_store::{store_id, BoundMethod, Method, SharedStore, Store, WeakBoundMethod};

static GLOBAL: LazyLock<Arc<BoundMethodCache>> =
    LazyLock::new(|| Arc::new(BoundMethodCache::new()));

struct StoreSlot {
    store: Weak<dyn Store>,
    methods: HashMap<usize, WeakBoundMethod>,
}

impl StoreSlot {
    fn is_alive(&self) -> bool {
        self.store.strong_count() > 0
    }

    fn live_bindings(&self) -> usize {
        self.methods.values().filter(|bound| bound.is_alive()).count()
    }
}

/// Cache of store-bound methods keyed by store and method identity
#[derive(Default)]
pub struct BoundMethodCache {
    slots: Mutex<HashMap<usize, StoreSlot>>,
}

impl BoundMethodCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache shared by connectors that don't bring their own
    pub fn global() -> Arc<BoundMethodCache> {
        Arc::clone(&GLOBAL)
    }

    /// Return the binding of `method` to `store`, creating it when no live
    /// binding exists
    ///
    /// While a previously returned binding is still held somewhere, repeated
    /// calls with the same store and method return that identical
    /// `BoundMethod`.
    pub fn bind(&self, store: &SharedStore, method: &Method) -> BoundMethod {
        let key = store_id(store);
        let mut slots = self.slots.lock();
        prune(&mut slots);

        let slot = slots.entry(key).or_insert_with(|| StoreSlot {
            store: Arc::downgrade(store),
            methods: HashMap::new(),
        });

        if let Some(bound) = slot.methods.get(&method.id()).and_then(WeakBoundMethod::upgrade) {
            return bound;
        }

        tracing::trace!("Binding {:?} to store {:#x}", method, key);
        let bound = method.bind(store);
        slot.methods.insert(method.id(), bound.downgrade());
        bound
    }

    /// Drop every binding made for `store`, returning how many were live
    pub fn evict_store(&self, store: &SharedStore) -> usize {
        self.slots
            .lock()
            .remove(&store_id(store))
            .map_or(0, |slot| slot.live_bindings())
    }

    /// Drop slots of released stores and bindings nobody holds
    ///
    /// `bind()` does this on every call; `sweep()` is for reclaiming the
    /// bookkeeping of an idle cache. Returns the number of entries dropped.
    pub fn sweep(&self) -> usize {
        let dropped = prune(&mut self.slots.lock());
        if dropped > 0 {
            tracing::debug!("Swept {} stale binding(s)", dropped);
        }
        dropped
    }

    /// Number of live stores with at least one live binding
    pub fn store_count(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.is_alive() && slot.live_bindings() > 0)
            .count()
    }

    /// Number of live bindings to live stores
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.is_alive())
            .map(StoreSlot::live_bindings)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Remove dead bindings, then slots that are dead or empty
fn prune(slots: &mut HashMap<usize, StoreSlot>) -> usize {
    let mut dropped = 0;
    slots.retain(|_, slot| {
        if !slot.is_alive() {
            dropped += slot.methods.len();
            return false;
        }
        let before = slot.methods.len();
        slot.methods.retain(|_, bound| bound.is_alive());
        dropped += before - slot.methods.len();
        !slot.methods.is_empty()
    });
    dropped
}

impl std::fmt::Debug for BoundMethodCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundMethodCache")
            .field("store_count", &self.store_count())
            .field("binding_count", &self.len())
            .finish()
    }
}
