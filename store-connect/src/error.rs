//! Error types for store-connect

/// Result type for connector operations
pub type Result<T> = std::result::Result<T, ConnectError>;

/// Errors raised while composing, rendering or notifying a connector
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// A change event without a type reached a connector that filters by type
    #[error("Change event has no type but the connector filters on a property map")]
    MissingChangeType,

    /// Single-child mode needs exactly one child
    #[error("Expected exactly one child element, found {found}")]
    ChildCount {
        /// Number of children actually supplied
        found: usize,
    },

    /// Neither or both render modes were configured
    #[error("Invalid render mode: {0}")]
    InvalidRenderMode(&'static str),

    /// The connector was rendered after it unmounted
    #[error("Connector is unmounted")]
    Unmounted,

    /// Invalid configuration provided
    #[error("Configuration error: {0}")]
    Config(String),
}
