//! Element composition primitives
//!
//! A minimal element model the connector renders into: a component type
//! plus its properties and children. Hosts translate elements into their
//! own node types.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use state_store::Value;

use crate::error::{ConnectError, Result};

/// Static metadata declared on a component type
pub type Statics = BTreeMap<String, Value>;

/// A renderable component type
pub trait Component: Send + Sync {
    /// Name used in diagnostics and for composed display names
    fn display_name(&self) -> &str;

    /// Static metadata attached to the component type
    fn statics(&self) -> Statics {
        Statics::new()
    }
}

/// Shared handle to a component type; compared by identity
pub type ComponentType = Arc<dyn Component>;

/// True if both handles are the same component type
pub fn same_component(a: &ComponentType, b: &ComponentType) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

/// A component type described by a name and its statics
#[derive(Debug, Clone, Default)]
pub struct NamedComponent {
    name: String,
    statics: Statics,
}

impl NamedComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            statics: Statics::new(),
        }
    }

    /// Attach a static value
    pub fn with_static(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.statics.insert(name.into(), value.into());
        self
    }

    /// Wrap into a shared component type
    pub fn shared(self) -> ComponentType {
        Arc::new(self)
    }
}

impl Component for NamedComponent {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn statics(&self) -> Statics {
        self.statics.clone()
    }
}

// ============================================================================
// Props
// ============================================================================

/// Named property values plus child elements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    values: BTreeMap<String, Value>,
    children: Vec<Element>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style child append
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Builder-style children replacement
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of named values, children excluded
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are neither values nor children
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.children.is_empty()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn set_children(&mut self, children: Vec<Element>) {
        self.children = children;
    }

    /// The single child element
    ///
    /// Fails with `ConnectError::ChildCount` unless exactly one child is present.
    pub fn only_child(&self) -> Result<&Element> {
        match self.children.as_slice() {
            [child] => Ok(child),
            children => Err(ConnectError::ChildCount {
                found: children.len(),
            }),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            children: Vec::new(),
        }
    }
}

// ============================================================================
// Element
// ============================================================================

/// A component type instantiated with properties
#[derive(Clone)]
pub struct Element {
    component: ComponentType,
    props: Props,
}

impl Element {
    pub fn new(component: ComponentType, props: Props) -> Self {
        Self { component, props }
    }

    pub fn component(&self) -> &ComponentType {
        &self.component
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn display_name(&self) -> &str {
        self.component.display_name()
    }

    /// True if this element renders `component`
    pub fn is_type(&self, component: &ComponentType) -> bool {
        same_component(&self.component, component)
    }

    /// Clone this element with `overrides` merged into its properties
    ///
    /// Values in `overrides` win over the element's own. The element keeps
    /// its own children unless `overrides` supplies some.
    pub fn clone_with(&self, overrides: Props) -> Element {
        let mut props = self.props.clone();
        let Props { values, children } = overrides;
        props.values.extend(values);
        if !children.is_empty() {
            props.children = children;
        }

        Element {
            component: Arc::clone(&self.component),
            props,
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        same_component(&self.component, &other.component) && self.props == other.props
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("component", &self.display_name())
            .field("props", &self.props)
            .finish()
    }
}
