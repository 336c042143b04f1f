//! The hosting UI framework, as seen by a connector

use std::sync::Arc;

/// Capabilities a connector needs from the framework hosting it
///
/// The host owns render scheduling: `request_render` may be called several
/// times within one update cycle and the host is expected to coalesce the
/// requests into a single render of the connector.
pub trait Host: Send + Sync {
    /// Ask the host to render the connector again
    fn request_render(&self);
}

impl<F> Host for F
where
    F: Fn() + Send + Sync,
{
    fn request_render(&self) {
        self()
    }
}

/// Shared handle to a host
pub type SharedHost = Arc<dyn Host>;
