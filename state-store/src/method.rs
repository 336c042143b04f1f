//! Callable store values
//!
//! A `Method` is a callable kept in a store that needs the store itself as
//! its execution context. Binding it to a store yields a `BoundMethod` that
//! callers can invoke with arguments alone.
//!
//! Both are compared by identity: two clones of the same `Method` are equal,
//! two separately built closures never are.

use std::any::type_name;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::{Result, StoreError};
use crate::store::{SharedStore, Store};
use crate::value::Value;

type MethodFn = dyn Fn(&dyn Store, &[Value]) -> Result<Value> + Send + Sync;

/// A callable store value that receives its store as context
///
/// # Example
///
/// ```rust
/// use state_store::{MemoryStore, Method, Store, Value};
///
/// let increment = Method::for_store(|store: &MemoryStore, _args: &[Value]| {
///     let next = store.get("count").and_then(|v| v.as_i64()).unwrap_or(0) + 1;
///     store.set("count", next)?;
///     Ok(Value::from(next))
/// });
///
/// let store = MemoryStore::new();
/// assert_eq!(increment.call(&store, &[]).unwrap(), Value::from(1));
/// ```
#[derive(Clone)]
pub struct Method {
    inner: Arc<MethodFn>,
}

impl Method {
    /// Wrap a closure taking any store as context
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn Store, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Wrap a closure written against a concrete store type
    ///
    /// Calling the method with a store of any other type fails with
    /// `StoreError::ContextMismatch`.
    pub fn for_store<S, F>(f: F) -> Self
    where
        S: Store,
        F: Fn(&S, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(move |store: &dyn Store, args: &[Value]| {
            let store = store
                .as_any()
                .downcast_ref::<S>()
                .ok_or(StoreError::ContextMismatch {
                    expected: type_name::<S>(),
                })?;
            f(store, args)
        })
    }

    /// Invoke with an explicit store context
    pub fn call(&self, store: &dyn Store, args: &[Value]) -> Result<Value> {
        (self.inner)(store, args)
    }

    /// Bind this method to a store
    ///
    /// Every call builds a new `BoundMethod`; callers that need a stable
    /// identity across calls should go through a cache.
    pub fn bind(&self, store: &SharedStore) -> BoundMethod {
        BoundMethod::new(self.clone(), store)
    }

    /// Address of the shared closure, used as an identity key
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }

    /// True if both handles point at the same closure
    pub fn ptr_eq(&self, other: &Method) -> bool {
        self.id() == other.id()
    }

    /// Number of live handles to this closure
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({:#x})", self.id())
    }
}

struct BoundInner {
    method: Method,
    store: Weak<dyn Store>,
}

/// A method pre-bound to a store
///
/// Holds the store weakly: a bound method never keeps its store alive,
/// and calling it after the store is gone fails with
/// `StoreError::StoreReleased`.
#[derive(Clone)]
pub struct BoundMethod {
    inner: Arc<BoundInner>,
}

impl BoundMethod {
    /// Bind `method` to `store`
    pub fn new(method: Method, store: &SharedStore) -> Self {
        Self {
            inner: Arc::new(BoundInner {
                method,
                store: Arc::downgrade(store),
            }),
        }
    }

    /// Invoke the method with its bound store as context
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        let store = self.inner.store.upgrade().ok_or(StoreError::StoreReleased)?;
        self.inner.method.call(store.as_ref(), args)
    }

    /// The unbound method
    pub fn method(&self) -> &Method {
        &self.inner.method
    }

    /// True if this was bound to `store` and the store is still alive
    pub fn is_bound_to(&self, store: &SharedStore) -> bool {
        self.inner
            .store
            .upgrade()
            .is_some_and(|bound| crate::store::same_store(&bound, store))
    }

    /// Address of the shared binding, used as an identity key
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    /// True if both handles are the same binding
    pub fn ptr_eq(&self, other: &BoundMethod) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of live handles to this binding
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// A handle that doesn't keep the binding, or its method, alive
    pub fn downgrade(&self) -> WeakBoundMethod {
        WeakBoundMethod {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl PartialEq for BoundMethod {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// Non-owning handle to a `BoundMethod`
#[derive(Clone)]
pub struct WeakBoundMethod {
    inner: Weak<BoundInner>,
}

impl WeakBoundMethod {
    /// The binding, if some `BoundMethod` handle still holds it
    pub fn upgrade(&self) -> Option<BoundMethod> {
        self.inner.upgrade().map(|inner| BoundMethod { inner })
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl fmt::Debug for WeakBoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakBoundMethod")
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMethod")
            .field("method", &self.inner.method)
            .field("store_alive", &(self.inner.store.strong_count() > 0))
            .finish()
    }
}
