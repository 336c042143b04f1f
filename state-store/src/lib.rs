//! Observable Store Contract
//!
//! The store side of store-connect: the capability a store must expose to
//! be observed, the values it hands out, and the change events it emits.
//!
//! # Features
//!
//! - **Store Contract**: `get`, `add_change_listener`, `remove_change_listener`
//! - **Typed Values**: plain data as JSON, callables as `Method`/`BoundMethod`
//! - **Typed Change Events**: one tag or an ordered sequence of tags
//! - **Reference Store**: `MemoryStore` with change detection
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use state_store::{listener, MemoryStore, SharedStore, Store, Value};
//!
//! let memory = Arc::new(MemoryStore::new());
//! let store: SharedStore = memory.clone();
//!
//! store.add_change_listener(listener(|event| {
//!     for tag in event.tags() {
//!         println!("{tag} changed");
//!     }
//!     Ok(())
//! }));
//!
//! memory.set("temperature", 72).unwrap();
//! assert_eq!(store.get("temperature"), Some(Value::from(72)));
//! ```
//!
//! # Architecture
//!
//! ```text
//! SharedStore = Arc<dyn Store>
//!     │
//!     ├── get(key) -> Option<Value>
//!     │       │
//!     │       └── Value: Data(serde_json::Value) | Method | Bound
//!     │
//!     └── change listeners: Arc<dyn Fn(&ChangeEvent)>
//!             │
//!             └── ChangeEvent { change_type: Option<ChangeType> }
//! ```

// Modules
pub mod error;
pub mod event;
pub mod method;
pub mod store;
pub mod value;

// Re-exports - Public API
pub use error::{ListenerError, Result, StoreError};
pub use event::{ChangeEvent, ChangeType};
pub use method::{BoundMethod, Method, WeakBoundMethod};
pub use store::{
    listener, same_listener, same_store, store_id, ChangeListener, MemoryStore, SharedStore, Store,
};
pub use value::Value;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::event::{ChangeEvent, ChangeType};
    pub use crate::method::{BoundMethod, Method};
    pub use crate::store::{listener, ChangeListener, MemoryStore, SharedStore, Store};
    pub use crate::value::Value;
}
