//! Declarative mapping from store keys to component properties

use std::collections::BTreeMap;

use state_store::Value;

use crate::error::{ConnectError, Result};

/// What a property map entry does with its store key
#[derive(Debug, Clone, PartialEq)]
pub enum Mapping {
    /// Read the key from the store and expose it under this property name
    Prop(String),
    /// Expose this value under the key name, bypassing the store
    Literal(Value),
}

/// Mapping from store keys to destination properties
///
/// The keys double as the connector's interest set: a change event only
/// triggers a re-render when one of its tags is a key of the map.
///
/// # Example
///
/// ```rust
/// use store_connect::{Mapping, PropertyMap};
///
/// let map = PropertyMap::new()
///     .prop("volume", "value")
///     .prop("increment", "on_click")
///     .literal("label", "Volume");
///
/// assert_eq!(map.len(), 3);
/// assert_eq!(map.get("volume"), Some(&Mapping::Prop("value".to_string())));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMap {
    entries: BTreeMap<String, Mapping>,
}

impl PropertyMap {
    /// Create an empty property map
    pub fn new() -> Self {
        Self::default()
    }

    /// Map store `key` to the property `dest`
    pub fn prop(mut self, key: impl Into<String>, dest: impl Into<String>) -> Self {
        self.insert(key, Mapping::Prop(dest.into()));
        self
    }

    /// Expose `value` as the property `key`
    pub fn literal(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, Mapping::Literal(value.into()));
        self
    }

    /// Insert an entry, returning the one it replaced
    pub fn insert(&mut self, key: impl Into<String>, mapping: Mapping) -> Option<Mapping> {
        self.entries.insert(key.into(), mapping)
    }

    pub fn get(&self, key: &str) -> Option<&Mapping> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Mapping)> {
        self.entries.iter().map(|(k, m)| (k.as_str(), m))
    }

    /// Build a map from a JSON object
    ///
    /// String values become `Mapping::Prop`; every other value, `null`
    /// included, becomes `Mapping::Literal`.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        let object = json.as_object().ok_or_else(|| {
            ConnectError::Config(format!("property map must be a JSON object, got {json}"))
        })?;

        Ok(object
            .iter()
            .map(|(key, value)| {
                let mapping = match value {
                    serde_json::Value::String(dest) => Mapping::Prop(dest.clone()),
                    other => Mapping::Literal(Value::Data(other.clone())),
                };
                (key.clone(), mapping)
            })
            .collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Mapping)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, Mapping)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, m)| (k.into(), m)).collect(),
        }
    }
}
