//! Error types for state-store

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Boxed error returned by a change listener
pub type ListenerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while reading, calling into, or notifying a store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A bound method outlived the store it was bound to
    #[error("Store was released before the bound method was called")]
    StoreReleased,

    /// A method was called with a store of a different concrete type
    #[error("Method expects a `{expected}` store as its context")]
    ContextMismatch {
        /// Type name the method was written against
        expected: &'static str,
    },

    /// A change listener failed while handling an event
    #[error("Change listener failed: {0}")]
    Listener(#[source] ListenerError),

    /// A method body reported a failure
    #[error("Method failed: {0}")]
    Method(String),
}
