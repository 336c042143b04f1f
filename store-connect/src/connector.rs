//! Connector instances
//!
//! A `Connector` is one mounted occurrence of a `ConnectedComponent`. The
//! host drives it through lifecycle hooks:
//!
//! ```text
//! instantiate ─► render ─► did_mount ─► (will_receive_props ─► render)* ─► will_unmount
//!                              │                                               │
//!                          subscribe                                      unsubscribe
//! ```
//!
//! Between mount and unmount the connector listens to its store. Each
//! change event goes through the change filter; events that pass ask the
//! host for a render. Events that arrive after unmount only unsubscribe.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use state_store::{listener, same_store, ChangeEvent, ListenerError, SharedStore};

use crate::connect::{Definition, RenderMode};
use crate::element::{Element, Props};
use crate::error::{ConnectError, Result};
use crate::filter::should_render;
use crate::host::SharedHost;
use crate::projection::Projector;
use crate::subscription::Subscription;

/// Lifecycle state of a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Created, not yet mounted
    Pending,
    /// Mounted and subscribed
    Mounted,
    /// Torn down; terminal
    Unmounted,
}

/// Properties a host hands to a connector on update
#[derive(Clone)]
pub struct ConnectorProps {
    /// The store to observe; a different store triggers a resubscribe
    pub store: SharedStore,
    /// Properties passed through to the rendered element
    pub props: Props,
}

impl ConnectorProps {
    pub fn new(store: SharedStore, props: Props) -> Self {
        Self { store, props }
    }
}

struct ConnectorState {
    lifecycle: LifecycleState,
    store: SharedStore,
    props: Props,
    subscription: Option<Subscription>,
}

struct Shared {
    definition: Arc<Definition>,
    host: SharedHost,
    state: Mutex<ConnectorState>,
}

/// A connected component instance
///
/// Created by `ConnectedComponent::instantiate`. Holds at most one active
/// store subscription; the store listener only references the connector
/// weakly.
pub struct Connector {
    shared: Arc<Shared>,
}

impl Connector {
    pub(crate) fn new(
        definition: Arc<Definition>,
        host: SharedHost,
        store: SharedStore,
        props: Props,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                definition,
                host,
                state: Mutex::new(ConnectorState {
                    lifecycle: LifecycleState::Pending,
                    store,
                    props,
                    subscription: None,
                }),
            }),
        }
    }

    /// Compute the element to display
    ///
    /// Fails with `ConnectError::ChildCount` in single-child mode unless
    /// exactly one child was passed, and with `ConnectError::Unmounted`
    /// after teardown.
    pub fn render(&self) -> Result<Element> {
        let (store, props) = {
            let state = self.shared.state.lock();
            if state.lifecycle == LifecycleState::Unmounted {
                return Err(ConnectError::Unmounted);
            }
            (state.store.clone(), state.props.clone())
        };

        let definition = &self.shared.definition;
        let projector = Projector {
            store: &store,
            property_map: definition.property_map.as_ref(),
            config: &definition.config,
            bound_methods: &definition.bound_methods,
        };

        match &definition.mode {
            RenderMode::Component(component) => {
                let outbound = projector.project(&props, true);
                Ok(Element::new(Arc::clone(component), outbound))
            }
            RenderMode::Child => {
                let child = props.only_child()?;
                Ok(child.clone_with(projector.project(&props, false)))
            }
        }
    }

    /// Host hook: the first render was committed
    ///
    /// Subscribes to the store, then runs the `on_mount` hook. Later calls
    /// are ignored.
    pub fn did_mount(&self) {
        let store = {
            let mut state = self.shared.state.lock();
            if state.lifecycle != LifecycleState::Pending {
                tracing::debug!("Ignoring did_mount in state {:?}", state.lifecycle);
                return;
            }
            state.lifecycle = LifecycleState::Mounted;
            state.store.clone()
        };

        self.shared.subscribe(&store);

        if let Some(hook) = &self.shared.definition.on_mount {
            hook();
        }
    }

    /// Host hook: new properties are about to be applied
    ///
    /// Resubscribes when the store differs from the current one.
    pub fn will_receive_props(&self, next: ConnectorProps) {
        let ConnectorProps { store, props } = next;

        let resubscribe = {
            let mut state = self.shared.state.lock();
            if state.lifecycle == LifecycleState::Unmounted {
                return;
            }
            state.props = props;
            let changed = !same_store(&state.store, &store);
            state.store = store.clone();
            changed && state.lifecycle == LifecycleState::Mounted
        };

        if resubscribe {
            self.shared.subscribe(&store);
        }
    }

    /// Host hook: the connector is about to be torn down
    ///
    /// Runs the `on_unmount` hook, then unsubscribes. Irreversible.
    pub fn will_unmount(&self) {
        {
            let mut state = self.shared.state.lock();
            if state.lifecycle == LifecycleState::Unmounted {
                return;
            }
            state.lifecycle = LifecycleState::Unmounted;
        }

        if let Some(hook) = &self.shared.definition.on_unmount {
            hook();
        }

        self.shared.unsubscribe();
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.shared.state.lock().lifecycle
    }

    /// True while a store subscription is active
    pub fn is_subscribed(&self) -> bool {
        self.shared
            .state
            .lock()
            .subscription
            .as_ref()
            .is_some_and(Subscription::is_active)
    }

    /// The store currently observed
    pub fn store(&self) -> SharedStore {
        self.shared.state.lock().store.clone()
    }
}

impl Shared {
    /// Subscribe to `store`, dropping any subscription to another store first
    fn subscribe(self: &Arc<Self>, store: &SharedStore) {
        let previous = {
            let mut state = self.state.lock();
            if state
                .subscription
                .as_ref()
                .is_some_and(|s| s.is_subscribed_to(store))
            {
                return;
            }
            state.subscription.take()
        };

        if let Some(previous) = previous {
            previous.unsubscribe();
        }

        let weak: Weak<Shared> = Arc::downgrade(self);
        let subscription = Subscription::subscribe(
            store,
            listener(move |event| match weak.upgrade() {
                Some(shared) => shared
                    .handle_change(event)
                    .map_err(|e| Box::new(e) as ListenerError),
                None => Ok(()),
            }),
        );

        let mut state = self.state.lock();
        if state.lifecycle == LifecycleState::Unmounted {
            // Torn down while subscribing
            drop(state);
            subscription.unsubscribe();
            return;
        }
        state.subscription = Some(subscription);
    }

    /// Invoke the unsubscribe capability if present
    fn unsubscribe(&self) {
        let subscription = self.state.lock().subscription.take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
    }

    fn handle_change(&self, event: &ChangeEvent) -> Result<()> {
        if self.state.lock().lifecycle == LifecycleState::Unmounted {
            tracing::warn!(
                "Change {:?} arrived after unmount, unsubscribing",
                event.change_type
            );
            self.unsubscribe();
            return Ok(());
        }

        if should_render(event, self.definition.property_map.as_ref())? {
            tracing::debug!("Change {:?} requests a render", event.change_type);
            self.host.request_render();
        } else {
            tracing::trace!("Change {:?} filtered out", event.change_type);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("lifecycle", &self.lifecycle())
            .field("subscribed", &self.is_subscribed())
            .finish()
    }
}
