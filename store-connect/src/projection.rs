//! Property projection
//!
//! Computes the properties handed to the wrapped component on every render:
//! the connector's received properties minus its private keys, overlaid with
//! one value per property map entry.

use state_store::{SharedStore, Value};

use crate::bound::BoundMethodCache;
use crate::config::ConnectConfig;
use crate::element::Props;
use crate::property_map::{Mapping, PropertyMap};

/// Everything a projection reads from besides the received properties
pub struct Projector<'a> {
    pub store: &'a SharedStore,
    pub property_map: Option<&'a PropertyMap>,
    pub config: &'a ConnectConfig,
    pub bound_methods: &'a BoundMethodCache,
}

impl Projector<'_> {
    /// Project `received` into the outbound property set
    ///
    /// Children are carried over only when `keep_children` is set.
    /// `Mapping::Prop` entries read the store and replace raw methods with
    /// their cached binding; a missing store key removes the destination.
    /// `Mapping::Literal` entries are assigned under their key unless null.
    pub fn project(&self, received: &Props, keep_children: bool) -> Props {
        let mut outbound: Props = received
            .iter()
            .filter(|(key, _)| !self.config.is_private(key))
            .map(|(key, value)| (key, value.clone()))
            .collect();

        if keep_children {
            outbound.set_children(received.children().to_vec());
        }

        let Some(map) = self.property_map else {
            return outbound;
        };

        for (key, mapping) in map.iter() {
            match mapping {
                Mapping::Prop(dest) => match self.store.get(key) {
                    Some(value) => {
                        outbound.insert(dest.as_str(), self.bind(value));
                    }
                    None => {
                        if self.config.warn_on_missing_keys {
                            tracing::warn!("Store has no value for mapped key '{}'", key);
                        }
                        outbound.remove(dest);
                    }
                },
                Mapping::Literal(value) if value.is_null() => {}
                Mapping::Literal(value) => {
                    outbound.insert(key, value.clone());
                }
            }
        }

        tracing::trace!("Projected {} propert(ies)", outbound.len());
        outbound
    }

    fn bind(&self, value: Value) -> Value {
        match value {
            Value::Method(method) if self.config.bind_methods => {
                Value::Bound(self.bound_methods.bind(self.store, &method))
            }
            other => other,
        }
    }
}
