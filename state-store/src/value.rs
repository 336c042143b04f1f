//! Values held by a store
//!
//! Plain data is carried as `serde_json::Value`; callables are carried as
//! `Method` (needs the store as context) or `BoundMethod` (already bound).

use crate::method::{BoundMethod, Method};

/// A value read from a store or handed to a component as a property
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Plain data
    Data(serde_json::Value),
    /// A callable that needs its store as context
    Method(Method),
    /// A callable already bound to its store
    Bound(BoundMethod),
}

impl Value {
    /// The JSON `null` value
    pub fn null() -> Self {
        Value::Data(serde_json::Value::Null)
    }

    /// True for JSON `null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Data(serde_json::Value::Null))
    }

    /// True for methods and bound methods
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Method(_) | Value::Bound(_))
    }

    pub fn as_data(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&Method> {
        match self {
            Value::Method(method) => Some(method),
            _ => None,
        }
    }

    pub fn as_bound(&self) -> Option<&BoundMethod> {
        match self {
            Value::Bound(bound) => Some(bound),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_data().and_then(serde_json::Value::as_i64)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_data().and_then(serde_json::Value::as_str)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_data().and_then(serde_json::Value::as_bool)
    }
}

impl From<serde_json::Value> for Value {
    fn from(data: serde_json::Value) -> Self {
        Value::Data(data)
    }
}

impl From<Method> for Value {
    fn from(method: Method) -> Self {
        Value::Method(method)
    }
}

impl From<BoundMethod> for Value {
    fn from(bound: BoundMethod) -> Self {
        Value::Bound(bound)
    }
}

macro_rules! impl_from_data {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Data(serde_json::Value::from(value))
                }
            }
        )*
    };
}

impl_from_data!(bool, i32, i64, u32, u64, f64, &str, String);
