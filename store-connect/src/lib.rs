//! Store Connect
//!
//! Binds UI components to an observable store. A connected component
//! subscribes to the store while mounted, re-renders when a change event
//! names a key it cares about, and hands the wrapped component properties
//! projected from the store.
//!
//! # Features
//!
//! - **Subscription Lifecycle**: subscribe on mount, resubscribe on store
//!   change, unsubscribe on unmount
//! - **Change Filtering**: re-render only for keys in the property map
//! - **Property Projection**: rename store keys, inject literals, bind store
//!   methods with a stable identity
//! - **Two Render Modes**: wrap a component type, or decorate a single child
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use state_store::{MemoryStore, SharedStore, Value};
//! use store_connect::{connect, NamedComponent, Props, PropertyMap};
//!
//! let memory = Arc::new(MemoryStore::with_values([("X", 42)]));
//! let store: SharedStore = memory.clone();
//!
//! let connected = connect(
//!     store,
//!     NamedComponent::new("Gauge").shared(),
//!     Some(PropertyMap::new().prop("X", "value")),
//!     || {},
//!     None,
//! )
//! .unwrap();
//!
//! let connector = connected.instantiate(Arc::new(|| println!("render requested")), Props::new());
//! let element = connector.render().unwrap();
//! connector.did_mount();
//!
//! assert_eq!(element.props().get("value"), Some(&Value::from(42)));
//! assert!(!element.props().contains_key("X"));
//!
//! memory.set("X", 43).unwrap(); // prints "render requested"
//! connector.will_unmount();
//! ```
//!
//! # Architecture
//!
//! ```text
//! Store ──ChangeEvent──► Connector ──filter──► Host::request_render
//!   ▲                        │
//!   └──────── get(key) ──────┤ render()
//!                            ▼
//!                 Projector ──► Element { component, props }
//!                     │
//!                     └── BoundMethodCache (weak per store)
//! ```

// Core modules
pub mod bound;
pub mod connect;
pub mod connector;
pub mod element;
pub mod filter;
pub mod host;
pub mod projection;
pub mod property_map;
pub mod subscription;

// Configuration
pub mod config;

// Error types
pub mod error;

// Logging infrastructure
pub mod logging;

// ============================================================================
// Re-exports
// ============================================================================

pub use bound::BoundMethodCache;
pub use config::ConnectConfig;
pub use connect::{connect, ConnectBuilder, ConnectedComponent, LifecycleHook, RenderMode};
pub use connector::{Connector, ConnectorProps, LifecycleState};
pub use element::{
    same_component, Component, ComponentType, Element, NamedComponent, Props, Statics,
};
pub use error::{ConnectError, Result};
pub use filter::should_render;
pub use host::{Host, SharedHost};
pub use projection::Projector;
pub use property_map::{Mapping, PropertyMap};
pub use subscription::Subscription;

pub use logging::{init_logging, init_logging_from_env, init_silent, LoggingError, LoggingMode};

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::config::ConnectConfig;
    pub use crate::connect::{connect, ConnectedComponent, RenderMode};
    pub use crate::connector::{Connector, ConnectorProps, LifecycleState};
    pub use crate::element::{Component, ComponentType, Element, NamedComponent, Props};
    pub use crate::host::Host;
    pub use crate::property_map::{Mapping, PropertyMap};
    pub use state_store::prelude::*;
}
