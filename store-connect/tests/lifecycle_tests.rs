//! Integration tests for connector lifecycle, rendering and projection.


use std::sync::Arc;

use rstest::rstest;
use state_store::{listener, ChangeEvent, MemoryStore, SharedStore, Store, StoreError, Value};
use store_connect::{
    connect, ConnectError, ConnectedComponent, ConnectorProps, LifecycleState, PropertyMap, Props,
};
use test_helpers::{create_store, element, gauge, increment, Fixture, HookCounter, RecordingHost};

// ============================================================================
// Subscription lifecycle
// ============================================================================

#[test]
fn test_subscribes_on_mount_and_unsubscribes_on_unmount() {
    let fx = Fixture::new(None);
    assert_eq!(fx.memory.listener_count(), 0);

    fx.mount();
    assert!(fx.connector.is_subscribed());
    assert_eq!(fx.memory.listener_count(), 1);

    fx.connector.will_unmount();
    assert!(!fx.connector.is_subscribed());
    assert_eq!(fx.memory.listener_count(), 0);
}

#[test]
fn test_store_switch_resubscribes() {
    let fx = Fixture::new(None);
    fx.mount();

    let (other_memory, other_store) = create_store();
    fx.connector
        .will_receive_props(ConnectorProps::new(other_store.clone(), Props::new()));

    assert_eq!(fx.memory.listener_count(), 0);
    assert_eq!(other_memory.listener_count(), 1);
    assert!(state_store::same_store(&fx.connector.store(), &other_store));

    // Changes on the old store no longer reach the host
    fx.memory.set("volume", 1).unwrap();
    assert_eq!(fx.host.renders(), 0);

    other_memory.set("volume", 1).unwrap();
    assert_eq!(fx.host.renders(), 1);
}

#[test]
fn test_same_store_does_not_resubscribe() {
    let fx = Fixture::new(None);
    fx.mount();

    fx.connector
        .will_receive_props(ConnectorProps::new(fx.store.clone(), Props::new().with("a", 1)));
    assert_eq!(fx.memory.listener_count(), 1);
    assert_eq!(
        fx.connector.render().unwrap().props().get("a"),
        Some(&Value::from(1))
    );
}

#[test]
fn test_store_switch_before_mount_subscribes_to_latest() {
    let fx = Fixture::new(None);
    let (other_memory, other_store) = create_store();

    fx.connector
        .will_receive_props(ConnectorProps::new(other_store, Props::new()));
    assert_eq!(other_memory.listener_count(), 0);

    fx.mount();
    assert_eq!(fx.memory.listener_count(), 0);
    assert_eq!(other_memory.listener_count(), 1);
}

#[test]
fn test_lifecycle_hooks() {
    let (_memory, store) = create_store();
    let mounted = HookCounter::default();
    let unmounted = HookCounter::default();

    let connected = connect(
        store,
        gauge(),
        None,
        mounted.hook(),
        Some(Arc::new(unmounted.hook())),
    )
    .unwrap();
    let connector = connected.instantiate(RecordingHost::new(), Props::new());

    connector.render().unwrap();
    assert_eq!(mounted.count(), 0);

    connector.did_mount();
    connector.did_mount();
    assert_eq!(mounted.count(), 1);

    connector.will_unmount();
    connector.will_unmount();
    assert_eq!(unmounted.count(), 1);
    assert_eq!(connector.lifecycle(), LifecycleState::Unmounted);
}

#[test]
fn test_late_notification_unsubscribes_instead_of_rendering() {
    let (memory, store) = create_store();
    let host = RecordingHost::new();
    let connected = ConnectedComponent::builder(store.clone())
        .component(gauge())
        .build()
        .unwrap();
    let connector = Arc::new(connected.instantiate(host.clone(), Props::new()));

    // Registered first, so it runs before the connector's listener and
    // unmounts it while the event is already in flight.
    let target = Arc::clone(&connector);
    store.add_change_listener(listener(move |_| {
        target.will_unmount();
        Ok(())
    }));

    connector.render().unwrap();
    connector.did_mount();
    assert_eq!(memory.listener_count(), 2);

    memory.set("volume", 1).unwrap();

    assert_eq!(host.renders(), 0);
    assert!(!connector.is_subscribed());
    assert_eq!(memory.listener_count(), 1);
}

// ============================================================================
// Change filtering through a live store
// ============================================================================

#[rstest]
#[case(None, "volume", 1)]
#[case(None, "anything", 1)]
#[case(Some(PropertyMap::new().prop("volume", "value")), "volume", 1)]
#[case(Some(PropertyMap::new().prop("volume", "value")), "mute", 0)]
#[case(Some(PropertyMap::new().literal("mute", true)), "mute", 1)]
fn test_change_filter(
    #[case] map: Option<PropertyMap>,
    #[case] changed_key: &str,
    #[case] expected_renders: usize,
) {
    let fx = Fixture::new(map);
    fx.mount();

    fx.memory.set(changed_key, 5).unwrap();
    assert_eq!(fx.host.renders(), expected_renders);
}

#[test]
fn test_multi_tag_event_renders_once() {
    let fx = Fixture::new(Some(PropertyMap::new().prop("a", "a").prop("b", "b")));
    fx.mount();

    fx.memory.set_many([("a", 1), ("b", 2), ("c", 3)]).unwrap();
    assert_eq!(fx.host.renders(), 1);
}

#[test]
fn test_untyped_event_with_map_propagates_error() {
    let fx = Fixture::new(Some(PropertyMap::new().prop("volume", "value")));
    fx.mount();

    let err = fx.memory.emit(&ChangeEvent::untyped()).unwrap_err();
    match err {
        StoreError::Listener(source) => {
            let connect_error = source.downcast_ref::<ConnectError>();
            assert!(matches!(connect_error, Some(ConnectError::MissingChangeType)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fx.host.renders(), 0);
}

#[test]
fn test_untyped_event_without_map_renders() {
    let fx = Fixture::new(None);
    fx.mount();

    fx.memory.emit(&ChangeEvent::untyped()).unwrap();
    assert_eq!(fx.host.renders(), 1);
}

// ============================================================================
// Projection and render dispatch
// ============================================================================

#[test]
fn test_component_mode_projects_store_values() {
    let fx = Fixture::with_props(
        Some(
            PropertyMap::new()
                .prop("X", "value")
                .literal("literalKey", "someLiteral"),
        ),
        Props::new()
            .with("title", "Volume")
            .with("store", "must not leak")
            .with_child(element("Label", Props::new())),
    );
    fx.memory.set("X", 42).unwrap();

    let rendered = fx.mount();
    let props = rendered.props();

    assert_eq!(rendered.display_name(), "Gauge");
    assert_eq!(props.get("value"), Some(&Value::from(42)));
    assert_eq!(props.get("literalKey"), Some(&Value::from("someLiteral")));
    assert_eq!(props.get("title"), Some(&Value::from("Volume")));
    assert!(!props.contains_key("X"));
    assert!(!props.contains_key("store"));
    assert_eq!(props.children().len(), 1);
}

#[test]
fn test_rerender_reads_fresh_values() {
    let fx = Fixture::new(Some(PropertyMap::new().prop("volume", "value")));
    fx.memory.set("volume", 10).unwrap();
    assert_eq!(fx.mount().props().get("value"), Some(&Value::from(10)));

    fx.memory.set("volume", 20).unwrap();
    assert_eq!(fx.host.renders(), 1);
    assert_eq!(
        fx.connector.render().unwrap().props().get("value"),
        Some(&Value::from(20))
    );
}

#[test]
fn test_bound_method_is_stable_and_uses_store() {
    let fx = Fixture::new(Some(PropertyMap::new().prop("increment", "on_click")));
    fx.memory.set("increment", increment()).unwrap();

    let first = fx.mount();
    let second = fx.connector.render().unwrap();

    let a = first.props().get("on_click").and_then(Value::as_bound).unwrap();
    let b = second.props().get("on_click").and_then(Value::as_bound).unwrap();
    assert!(a.ptr_eq(b));

    assert_eq!(a.call(&[]).unwrap(), Value::from(1));
    assert_eq!(b.call(&[Value::from(4)]).unwrap(), Value::from(5));
    assert_eq!(fx.memory.get("count"), Some(Value::from(5)));
}

#[test]
fn test_bound_methods_shared_across_connectors_of_one_store() {
    let (memory, store) = create_store();
    memory.set("increment", increment()).unwrap();
    let cache = Arc::new(store_connect::BoundMethodCache::new());

    let build = || {
        ConnectedComponent::builder(store.clone())
            .component(gauge())
            .property_map(PropertyMap::new().prop("increment", "on_click"))
            .bound_methods(cache.clone())
            .build()
            .unwrap()
            .instantiate(RecordingHost::new(), Props::new())
    };

    let first = build().render().unwrap();
    let second = build().render().unwrap();
    let a = first.props().get("on_click").and_then(Value::as_bound).unwrap();
    let b = second.props().get("on_click").and_then(Value::as_bound).unwrap();
    assert!(a.ptr_eq(b));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_replaced_store_methods_are_released() {
    let fx = Fixture::new(Some(PropertyMap::new().prop("handler", "on_click")));
    let first = increment();
    fx.memory.set("handler", first.clone()).unwrap();
    fx.mount();

    for _ in 0..1000 {
        fx.memory.set("handler", increment()).unwrap();
        let rendered = fx.connector.render().unwrap();
        assert!(rendered.props().get("on_click").and_then(Value::as_bound).is_some());
    }

    fx.memory.remove("handler").unwrap();
    assert!(!fx.connector.render().unwrap().props().contains_key("on_click"));

    let cache = fx.connected.bound_methods();
    assert_eq!(cache.len(), 0);
    assert_eq!(cache.store_count(), 0);
    assert_eq!(first.strong_count(), 1);
}

#[test]
fn test_dropped_store_releases_bound_methods() {
    let (memory, store) = create_store();
    let method = increment();
    memory.set("increment", method.clone()).unwrap();
    let cache = Arc::new(store_connect::BoundMethodCache::new());

    let connected = ConnectedComponent::builder(store)
        .component(gauge())
        .property_map(PropertyMap::new().prop("increment", "on_click"))
        .bound_methods(cache.clone())
        .build()
        .unwrap();
    let rendered = connected
        .instantiate(RecordingHost::new(), Props::new())
        .render()
        .unwrap();
    assert_eq!(cache.len(), 1);

    drop(rendered);
    drop(connected);
    drop(memory);

    assert_eq!(cache.len(), 0);
    assert_eq!(cache.store_count(), 0);
    assert_eq!(method.strong_count(), 1);
}

#[test]
fn test_child_mode_merges_into_child() {
    let (memory, store) = create_store();
    memory.set("volume", 7).unwrap();
    let connected = ConnectedComponent::builder(store)
        .single_child()
        .property_map(PropertyMap::new().prop("volume", "value"))
        .build()
        .unwrap();

    let grandchild = element("Icon", Props::new());
    let child = element(
        "Slider",
        Props::new()
            .with("value", 0)
            .with("orientation", "vertical")
            .with_child(grandchild.clone()),
    );
    let connector = connected.instantiate(
        RecordingHost::new(),
        Props::new().with("title", "passed").with_child(child.clone()),
    );

    let rendered = connector.render().unwrap();
    assert!(rendered.is_type(child.component()));
    assert_eq!(rendered.props().get("value"), Some(&Value::from(7)));
    assert_eq!(rendered.props().get("orientation"), Some(&Value::from("vertical")));
    assert_eq!(rendered.props().get("title"), Some(&Value::from("passed")));
    assert_eq!(rendered.props().children(), &[grandchild]);
}

#[rstest]
#[case(0)]
#[case(2)]
#[case(3)]
fn test_child_mode_requires_exactly_one_child(#[case] count: usize) {
    let (_memory, store) = create_store();
    let mounted = HookCounter::default();
    let connected = ConnectedComponent::builder(store)
        .single_child()
        .on_mount(mounted.hook())
        .build()
        .unwrap();

    let children = (0..count).map(|i| element(&format!("Child{i}"), Props::new()));
    let connector = connected.instantiate(RecordingHost::new(), Props::new().with_children(children));

    let result = connector.render();
    assert!(matches!(result, Err(ConnectError::ChildCount { found }) if found == count));
    assert_eq!(mounted.count(), 0);
}

#[test]
fn test_instantiate_with_other_store() {
    let (_memory, store) = create_store();
    let other = Arc::new(MemoryStore::with_values([("volume", 99)]));
    let other_store: SharedStore = other.clone();

    let connected = ConnectedComponent::builder(store)
        .component(gauge())
        .property_map(PropertyMap::new().prop("volume", "value"))
        .build()
        .unwrap();
    let connector = connected.instantiate_with_store(RecordingHost::new(), other_store, Props::new());

    assert_eq!(
        connector.render().unwrap().props().get("value"),
        Some(&Value::from(99))
    );
    connector.did_mount();
    assert_eq!(other.listener_count(), 1);
}
