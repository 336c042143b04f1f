//! Configuration for connected components
//!
//! Controls which received properties are withheld from the wrapped
//! component, which static names are never hoisted, and how store values
//! are projected.

use crate::error::{ConnectError, Result};

/// Keys that configure the connector itself and never reach the wrapped component
pub const PRIVATE_KEYS: &[&str] = &["store", "property_map", "on_mount", "on_unmount", "component"];

/// Static names owned by the host framework, never hoisted onto a connected component
pub const RESERVED_STATICS: &[&str] = &[
    "display_name",
    "default_props",
    "prop_types",
    "context_types",
    "child_context_types",
    "get_default_props",
    "get_derived_state_from_props",
    "mixins",
    "type",
];

/// Configuration for a connected component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectConfig {
    /// Received property names withheld from the outbound property set
    /// Default: `PRIVATE_KEYS`
    pub private_keys: Vec<String>,

    /// Static names never copied from the wrapped component
    /// Default: `RESERVED_STATICS`
    pub reserved_statics: Vec<String>,

    /// Copy the wrapped component's statics onto the connected component
    /// Default: true
    pub hoist_statics: bool,

    /// Substitute store-bound methods for raw methods read from the store
    /// Default: true
    pub bind_methods: bool,

    /// Log a warning when a mapped key is absent from the store
    /// Default: false
    pub warn_on_missing_keys: bool,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            private_keys: PRIVATE_KEYS.iter().map(|k| k.to_string()).collect(),
            reserved_statics: RESERVED_STATICS.iter().map(|k| k.to_string()).collect(),
            hoist_statics: true,
            bind_methods: true,
            warn_on_missing_keys: false,
        }
    }
}

impl ConnectConfig {
    /// Create a new ConnectConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus a warning for every mapped key the store lacks
    pub fn strict() -> Self {
        Self {
            warn_on_missing_keys: true,
            ..Default::default()
        }
    }

    /// Withhold an additional received property name
    pub fn with_private_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !self.is_private(&key) {
            self.private_keys.push(key);
        }
        self
    }

    /// Never hoist an additional static name
    pub fn with_reserved_static(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.is_reserved_static(&name) {
            self.reserved_statics.push(name);
        }
        self
    }

    pub fn is_private(&self, key: &str) -> bool {
        self.private_keys.iter().any(|k| k == key)
    }

    pub fn is_reserved_static(&self, name: &str) -> bool {
        self.reserved_statics.iter().any(|n| n == name)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.private_keys.iter().any(String::is_empty) {
            return Err(ConnectError::Config(
                "private_keys must not contain empty names".to_string(),
            ));
        }

        if self.reserved_statics.iter().any(String::is_empty) {
            return Err(ConnectError::Config(
                "reserved_statics must not contain empty names".to_string(),
            ));
        }

        Ok(())
    }
}
