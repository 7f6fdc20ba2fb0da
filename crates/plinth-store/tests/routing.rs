//! Subscription routing, broadcast delivery, handles, and change events.

use std::cell::RefCell;
use std::rc::Rc;

use plinth_model::Value;
use plinth_store::{InputOptions, StoreError, WorkspaceEvent, WorkspaceStore};
use serde_json::json;

/// One emitter plus subscribers covering every subscription state.
fn routed_store() -> WorkspaceStore {
    let store = WorkspaceStore::new();
    store
        .set_workspace(&json!([
            [{"type": "slider-widget", "id": "emitter", "inputs": {"volume": {}}}],
            [
                {"type": "gauge-widget", "id": "open", "inputs": {
                    "volume": {"subscriptionState": "all"}
                }},
                {"type": "gauge-widget", "id": "chosen", "inputs": {
                    "volume": {"subscriptions": ["emitter"]}
                }},
                {"type": "gauge-widget", "id": "deaf", "inputs": {
                    "volume": {"subscriptionState": "none"}
                }},
                {"type": "gauge-widget", "id": "elsewhere", "inputs": {
                    "volume": {"subscriptions": ["another"]}
                }},
                {"type": "text-widget", "id": "unrelated"},
            ],
        ]))
        .unwrap();
    store
}

fn volume_of(store: &WorkspaceStore, id: &str) -> Value {
    store.get_widget(id).unwrap().inputs["volume"].value.clone()
}

#[test]
fn subscriber_query_follows_subscription_state() {
    let store = routed_store();
    let mut subscribers = store.subscribers_of("emitter", "volume");
    subscribers.sort();
    assert_eq!(subscribers, vec!["chosen".to_owned(), "open".to_owned()]);
}

#[test]
fn emitter_is_excluded_from_its_own_broadcast() {
    let store = routed_store();
    assert!(!store.subscribers_of("emitter", "volume").contains(&"emitter".to_owned()));

    store.emit("emitter", "volume", 0.8);
    // The emitter's own input keeps its value.
    assert_eq!(volume_of(&store, "emitter"), Value::default());
}

#[test]
fn emit_updates_exactly_the_eligible_subscribers() {
    let store = routed_store();
    store.emit("emitter", "volume", 0.8);

    assert_eq!(volume_of(&store, "open"), Value::Number(0.8));
    assert_eq!(volume_of(&store, "chosen"), Value::Number(0.8));
    assert_eq!(volume_of(&store, "deaf"), Value::default());
    assert_eq!(volume_of(&store, "elsewhere"), Value::default());
    // A widget with no input under the key is not delivered to, and the
    // broadcast still completes.
    assert!(store.get_widget("unrelated").unwrap().inputs.is_empty());
}

#[test]
fn broadcast_is_synchronous_and_total() {
    let store = routed_store();
    store.emit("emitter", "volume", "loud");

    // All eligible subscribers were updated before emit returned.
    assert_eq!(volume_of(&store, "open"), Value::from("loud"));
    assert_eq!(volume_of(&store, "chosen"), Value::from("loud"));
}

#[test]
fn output_handle_emits_like_the_store() {
    let store = routed_store();
    let output = store.output("emitter", "volume");
    output.send(true);
    assert_eq!(volume_of(&store, "open"), Value::Bool(true));
}

#[test]
fn request_input_lazily_creates_the_slot() {
    let store = routed_store();
    let handle = store
        .request_input("unrelated", "volume", InputOptions { shared: true })
        .unwrap();
    assert_eq!(handle.get(), Value::default());

    let created = store.get_widget("unrelated").unwrap();
    assert!(created.inputs["volume"].shared);

    // Now that the slot exists with default state `all`, broadcasts reach it.
    store.emit("emitter", "volume", 0.3);
    assert_eq!(handle.get(), Value::Number(0.3));
}

#[test]
fn request_input_for_unknown_widget_fails() {
    let store = routed_store();
    assert!(matches!(
        store.request_input("ghost", "volume", InputOptions::default()),
        Err(StoreError::WidgetNotFound(_))
    ));
}

#[test]
fn input_handle_writes_do_not_broadcast() {
    let store = routed_store();
    let handle = store
        .request_input("open", "volume", InputOptions::default())
        .unwrap();

    handle.set(0.9);
    assert_eq!(volume_of(&store, "open"), Value::Number(0.9));
    // No other subscriber saw the write.
    assert_eq!(volume_of(&store, "chosen"), Value::default());
}

#[test]
fn input_handle_write_is_visible_to_shared_parameters() {
    let store = routed_store();
    let handle = store
        .request_input("open", "shutter", InputOptions { shared: true })
        .unwrap();
    handle.set("1/250");

    let shared = store.shared_parameters();
    assert_eq!(shared.get("open.shutter"), Some(&Value::from("1/250")));
}

#[test]
fn stale_handle_degrades_gracefully() {
    let store = routed_store();
    let handle = store
        .request_input("open", "volume", InputOptions::default())
        .unwrap();
    store.remove_widget("open").unwrap();

    // Reads fall back to the default; writes are dropped with a diagnostic.
    handle.set(0.4);
    assert_eq!(handle.get(), Value::default());
    assert!(!store.contains_widget("open"));
}

#[test]
fn shared_parameters_ignore_subscription_state() {
    let store = WorkspaceStore::new();
    store
        .set_workspace(&json!([[
            {"type": "text-widget", "id": "a", "inputs": {
                "body": {"value": "x", "shared": true, "subscriptionState": "none"},
                "title": {"value": "t"}
            }},
        ]]))
        .unwrap();

    let shared = store.shared_parameters();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared.get("a.body"), Some(&Value::from("x")));
}

#[test]
fn watchers_observe_two_phase_replacement() {
    let store = WorkspaceStore::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let observed_empty = Rc::new(RefCell::new(false));
    let empty_flag = Rc::clone(&observed_empty);
    let probe = store.clone();

    let _guard = store.watch(move |event| {
        sink.borrow_mut().push(*event);
        if *event == WorkspaceEvent::Cleared {
            *empty_flag.borrow_mut() = probe.widget_count() == 0;
        }
    });

    store
        .set_workspace(&json!([[{"type": "text-widget"}]]))
        .unwrap();

    assert_eq!(
        *events.borrow(),
        vec![WorkspaceEvent::Cleared, WorkspaceEvent::Structure]
    );
    // The transient empty state was really observable mid-replacement.
    assert!(*observed_empty.borrow());
}

#[test]
fn watchers_observe_structure_and_value_events() {
    let store = routed_store();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let _guard = store.watch(move |event| sink.borrow_mut().push(*event));

    store.insert_column(0);
    store.emit("emitter", "volume", 1.0);
    store.remove_widget("deaf").unwrap();

    assert_eq!(
        *events.borrow(),
        vec![
            WorkspaceEvent::Structure,
            WorkspaceEvent::ValueWritten,
            WorkspaceEvent::Structure,
        ]
    );
}

#[test]
fn dropped_watch_guard_stops_events() {
    let store = routed_store();
    let count = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&count);
    let guard = store.watch(move |_| *sink.borrow_mut() += 1);

    store.insert_column(0);
    assert_eq!(*count.borrow(), 1);

    drop(guard);
    store.insert_column(0);
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn revision_advances_only_on_committed_mutations() {
    let store = routed_store();
    let before = store.revision();

    // Failed operation: no revision change.
    assert!(store.remove_widget("ghost").is_err());
    assert_eq!(store.revision(), before);

    // Broadcast with no eligible subscribers: no revision change.
    store.emit("emitter", "no-such-key", 1.0);
    assert_eq!(store.revision(), before);

    store.emit("emitter", "volume", 1.0);
    assert!(store.revision() > before);
}
