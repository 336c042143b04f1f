//! Composing a store with a component
//!
//! `connect()` and `ConnectBuilder` produce a `ConnectedComponent`: a
//! component type that, when instantiated, subscribes to the store and
//! renders either the wrapped component or its single child with
//! properties projected from the store.

use std::fmt;
use std::sync::Arc;

use state_store::SharedStore;

use crate::bound::BoundMethodCache;
use crate::config::ConnectConfig;
use crate::connector::Connector;
use crate::element::{Component, ComponentType, Props, Statics};
use crate::error::{ConnectError, Result};
use crate::host::SharedHost;
use crate::property_map::PropertyMap;

/// Callback invoked on a lifecycle transition
pub type LifecycleHook = Arc<dyn Fn() + Send + Sync>;

/// What a connector renders
#[derive(Clone)]
pub enum RenderMode {
    /// Render this component type with the projected properties
    Component(ComponentType),
    /// Clone the connector's single child, merging in the projected properties
    Child,
}

impl fmt::Debug for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Component(component) => f
                .debug_tuple("Component")
                .field(&component.display_name())
                .finish(),
            RenderMode::Child => f.write_str("Child"),
        }
    }
}

/// Everything shared by the connectors of one connected component
pub(crate) struct Definition {
    pub(crate) store: SharedStore,
    pub(crate) mode: RenderMode,
    pub(crate) property_map: Option<PropertyMap>,
    pub(crate) on_mount: Option<LifecycleHook>,
    pub(crate) on_unmount: Option<LifecycleHook>,
    pub(crate) config: ConnectConfig,
    pub(crate) bound_methods: Arc<BoundMethodCache>,
    display_name: String,
    statics: Statics,
}

/// Wire `component` to `store`
///
/// `on_mount` runs after the first successful render, `on_unmount` before
/// teardown completes. Use `ConnectedComponent::builder` for single-child
/// mode or a custom configuration.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use state_store::{MemoryStore, SharedStore};
/// use store_connect::{connect, Component, NamedComponent, PropertyMap};
///
/// let store: SharedStore = Arc::new(MemoryStore::with_values([("volume", 30)]));
/// let gauge = NamedComponent::new("Gauge").shared();
///
/// let connected = connect(
///     store,
///     gauge,
///     Some(PropertyMap::new().prop("volume", "value")),
///     || println!("mounted"),
///     None,
/// )
/// .unwrap();
///
/// assert_eq!(connected.display_name(), "Connect(Gauge)");
/// ```
pub fn connect<F>(
    store: SharedStore,
    component: ComponentType,
    property_map: Option<PropertyMap>,
    on_mount: F,
    on_unmount: Option<LifecycleHook>,
) -> Result<ConnectedComponent>
where
    F: Fn() + Send + Sync + 'static,
{
    let mut builder = ConnectedComponent::builder(store)
        .component(component)
        .on_mount(on_mount);

    if let Some(map) = property_map {
        builder = builder.property_map(map);
    }
    if let Some(hook) = on_unmount {
        builder.on_unmount = Some(hook);
    }

    builder.build()
}

/// Builder for a `ConnectedComponent`
///
/// Exactly one of `component()` or `single_child()` must be called.
pub struct ConnectBuilder {
    store: SharedStore,
    component: Option<ComponentType>,
    single_child: bool,
    property_map: Option<PropertyMap>,
    on_mount: Option<LifecycleHook>,
    on_unmount: Option<LifecycleHook>,
    config: ConnectConfig,
    bound_methods: Option<Arc<BoundMethodCache>>,
}

impl ConnectBuilder {
    /// Render `component` with the projected properties
    pub fn component(mut self, component: ComponentType) -> Self {
        self.component = Some(component);
        self
    }

    /// Render the connector's single child with the projected properties merged in
    pub fn single_child(mut self) -> Self {
        self.single_child = true;
        self
    }

    /// Filter changes by, and project values through, this map
    pub fn property_map(mut self, property_map: PropertyMap) -> Self {
        self.property_map = Some(property_map);
        self
    }

    pub fn on_mount<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_mount = Some(Arc::new(hook));
        self
    }

    pub fn on_unmount<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_unmount = Some(Arc::new(hook));
        self
    }

    pub fn config(mut self, config: ConnectConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a private bound-method cache instead of the global one
    pub fn bound_methods(mut self, cache: Arc<BoundMethodCache>) -> Self {
        self.bound_methods = Some(cache);
        self
    }

    /// Validate and build
    pub fn build(self) -> Result<ConnectedComponent> {
        self.config.validate()?;

        let mode = match (self.component, self.single_child) {
            (Some(component), false) => RenderMode::Component(component),
            (None, true) => RenderMode::Child,
            (None, false) => {
                return Err(ConnectError::InvalidRenderMode(
                    "neither a component nor single-child mode was configured",
                ))
            }
            (Some(_), true) => {
                return Err(ConnectError::InvalidRenderMode(
                    "a component and single-child mode are mutually exclusive",
                ))
            }
        };

        let (display_name, statics) = match &mode {
            RenderMode::Component(component) => {
                let statics = if self.config.hoist_statics {
                    hoist_statics(component.as_ref(), &self.config)
                } else {
                    Statics::new()
                };
                (format!("Connect({})", component.display_name()), statics)
            }
            RenderMode::Child => ("Connect".to_string(), Statics::new()),
        };

        tracing::debug!(
            "Built {} with {} mapped key(s)",
            display_name,
            self.property_map.as_ref().map_or(0, PropertyMap::len)
        );

        Ok(ConnectedComponent {
            definition: Arc::new(Definition {
                store: self.store,
                mode,
                property_map: self.property_map,
                on_mount: self.on_mount,
                on_unmount: self.on_unmount,
                config: self.config,
                bound_methods: self.bound_methods.unwrap_or_else(BoundMethodCache::global),
                display_name,
                statics,
            }),
        })
    }
}

/// Copy a component's statics, skipping names the host framework owns
fn hoist_statics(component: &dyn Component, config: &ConnectConfig) -> Statics {
    component
        .statics()
        .into_iter()
        .filter(|(name, _)| !config.is_reserved_static(name))
        .collect()
}

/// A component type wired to a store
#[derive(Clone)]
pub struct ConnectedComponent {
    definition: Arc<Definition>,
}

impl ConnectedComponent {
    /// Start building a connected component observing `store`
    pub fn builder(store: SharedStore) -> ConnectBuilder {
        ConnectBuilder {
            store,
            component: None,
            single_child: false,
            property_map: None,
            on_mount: None,
            on_unmount: None,
            config: ConnectConfig::default(),
            bound_methods: None,
        }
    }

    /// Create a connector instance observing the configured store
    pub fn instantiate(&self, host: SharedHost, props: Props) -> Connector {
        self.instantiate_with_store(host, self.definition.store.clone(), props)
    }

    /// Create a connector instance observing `store` instead of the configured one
    pub fn instantiate_with_store(&self, host: SharedHost, store: SharedStore, props: Props) -> Connector {
        Connector::new(Arc::clone(&self.definition), host, store, props)
    }

    /// The store instances observe by default
    pub fn store(&self) -> &SharedStore {
        &self.definition.store
    }

    pub fn mode(&self) -> &RenderMode {
        &self.definition.mode
    }

    pub fn property_map(&self) -> Option<&PropertyMap> {
        self.definition.property_map.as_ref()
    }

    pub fn config(&self) -> &ConnectConfig {
        &self.definition.config
    }

    /// The cache instances bind store methods through
    pub fn bound_methods(&self) -> &Arc<BoundMethodCache> {
        &self.definition.bound_methods
    }
}

impl Component for ConnectedComponent {
    fn display_name(&self) -> &str {
        &self.definition.display_name
    }

    fn statics(&self) -> Statics {
        self.definition.statics.clone()
    }
}

impl fmt::Debug for ConnectedComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectedComponent")
            .field("display_name", &self.definition.display_name)
            .field("mode", &self.definition.mode)
            .field("property_map", &self.definition.property_map)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::NamedComponent;
    use state_store::{MemoryStore, Value};

    fn store() -> SharedStore {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_connect_wraps_component() {
        let connected = connect(
            store(),
            NamedComponent::new("Gauge").shared(),
            None,
            || {},
            None,
        )
        .unwrap();

        assert_eq!(connected.display_name(), "Connect(Gauge)");
        assert!(matches!(connected.mode(), RenderMode::Component(_)));
        assert!(connected.property_map().is_none());
    }

    #[test]
    fn test_builder_requires_exactly_one_mode() {
        let neither = ConnectedComponent::builder(store()).build();
        assert!(matches!(neither, Err(ConnectError::InvalidRenderMode(_))));

        let both = ConnectedComponent::builder(store())
            .component(NamedComponent::new("Gauge").shared())
            .single_child()
            .build();
        assert!(matches!(both, Err(ConnectError::InvalidRenderMode(_))));

        let child = ConnectedComponent::builder(store()).single_child().build().unwrap();
        assert!(matches!(child.mode(), RenderMode::Child));
        assert_eq!(child.display_name(), "Connect");
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = ConnectedComponent::builder(store())
            .single_child()
            .config(ConnectConfig::new().with_private_key(""))
            .build();
        assert!(matches!(result, Err(ConnectError::Config(_))));
    }

    #[test]
    fn test_statics_hoisted_except_reserved() {
        let gauge = NamedComponent::new("Gauge")
            .with_static("max", 100)
            .with_static("display_name", "Other")
            .with_static("prop_types", "checked")
            .shared();

        let connected = ConnectedComponent::builder(store())
            .component(gauge)
            .build()
            .unwrap();

        let statics = connected.statics();
        assert_eq!(statics.get("max"), Some(&Value::from(100)));
        assert!(!statics.contains_key("display_name"));
        assert!(!statics.contains_key("prop_types"));
    }

    #[test]
    fn test_hoisting_can_be_disabled() {
        let config = ConnectConfig {
            hoist_statics: false,
            ..Default::default()
        };
        let connected = ConnectedComponent::builder(store())
            .component(NamedComponent::new("Gauge").with_static("max", 100).shared())
            .config(config)
            .build()
            .unwrap();

        assert!(connected.statics().is_empty());
    }

    #[test]
    fn test_connected_components_nest() {
        let inner: ComponentType = Arc::new(
            ConnectedComponent::builder(store())
                .component(NamedComponent::new("Gauge").with_static("max", 1).shared())
                .build()
                .unwrap(),
        );
        let outer = connect(store(), inner, None, || {}, None).unwrap();

        assert_eq!(outer.display_name(), "Connect(Connect(Gauge))");
        assert_eq!(outer.statics().get("max"), Some(&Value::from(1)));
    }
}
