//! A counter wired to a memory store
//!
//! Mounts a connected "Counter" component, clicks its bound increment
//! handler a few times and prints every render the host performs.
//!
//! Usage: STORE_CONNECT_LOG_LEVEL=debug cargo run -p store-connect --example counter

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use state_store::{MemoryStore, Method, SharedStore, Store, Value};
use store_connect::{connect, init_logging_from_env, Element, NamedComponent, PropertyMap, Props};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging_from_env()?;

    let memory = Arc::new(MemoryStore::new());
    memory.set("count", 0)?;
    memory.set(
        "increment",
        Method::for_store(|store: &MemoryStore, _args: &[Value]| {
            let next = store.get("count").and_then(|v| v.as_i64()).unwrap_or(0) + 1;
            store.set("count", next)?;
            Ok(Value::from(next))
        }),
    )?;
    let store: SharedStore = memory.clone();

    let connected = connect(
        store,
        NamedComponent::new("Counter").shared(),
        Some(
            PropertyMap::new()
                .prop("count", "value")
                .prop("increment", "on_click")
                .literal("label", "Clicks"),
        ),
        || println!("mounted"),
        Some(Arc::new(|| println!("unmounting"))),
    )?;

    let pending = Arc::new(AtomicUsize::new(0));
    let requests = Arc::clone(&pending);
    let host = Arc::new(move || {
        requests.fetch_add(1, Ordering::SeqCst);
    });

    let connector = connected.instantiate(host, Props::new());
    let mut element = connector.render()?;
    print_element(&element);
    connector.did_mount();

    for _ in 0..3 {
        let on_click = element
            .props()
            .get("on_click")
            .and_then(Value::as_bound)
            .ok_or("on_click is not a bound method")?
            .clone();
        on_click.call(&[])?;

        // Stand-in for the host's render loop
        if pending.swap(0, Ordering::SeqCst) > 0 {
            element = connector.render()?;
            print_element(&element);
        }
    }

    // Not in the property map, so no render is requested
    memory.set("unrelated", true)?;
    println!("pending renders after unrelated change: {}", pending.load(Ordering::SeqCst));

    connector.will_unmount();
    Ok(())
}

fn print_element(element: &Element) {
    let value = element.props().get("value").and_then(Value::as_i64).unwrap_or_default();
    let label = element.props().get("label").and_then(Value::as_str).unwrap_or_default();
    println!("<{} label={:?} value={}>", element.display_name(), label, value);
}
