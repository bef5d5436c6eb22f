//! End-to-end registry semantics through the public API.

use serde_json::json;
use stream_store::testing::{EventCollector, ValueProbe};
use stream_store::{StoreError, StreamStore};

#[test]
fn read_and_fresh_subscription_always_see_the_latest_value() {
    let store = StreamStore::new();
    store.create_action("n", json!(0)).unwrap();
    for value in 1..=5 {
        store.dispatch("n", json!(value)).unwrap();
    }

    assert_eq!(store.read("n"), Some(json!(5)));
    let probe = ValueProbe::attach(&store, "n").unwrap();
    // Replay arrives before any further dispatch.
    assert_eq!(probe.values(), vec![json!(5)]);
}

#[test]
fn recreating_an_existing_name_fails_and_leaves_the_stream_intact() {
    let store = StreamStore::new();
    store.create_action("n", json!("original")).unwrap();

    let err = store.create_action("n", json!("usurper")).unwrap_err();
    assert_eq!(err, StoreError::DuplicateName("n".into()));
    assert_eq!(store.read("n"), Some(json!("original")));
}

#[test]
fn unknown_names_fail_everywhere_but_read() {
    let store = StreamStore::new();

    assert_eq!(
        store.dispatch("ghost", json!(1)).unwrap_err(),
        StoreError::UnknownAction("ghost".into())
    );
    assert_eq!(
        store.destroy_action("ghost").unwrap_err(),
        StoreError::UnknownAction("ghost".into())
    );
    assert_eq!(
        store.create_effect("ghost", |_, _| {}).unwrap_err(),
        StoreError::UnknownAction("ghost".into())
    );
    assert_eq!(
        store.subscribe_to_action("ghost", |_| {}).unwrap_err(),
        StoreError::UnknownAction("ghost".into())
    );
    assert_eq!(store.read("ghost"), None);
}

#[test]
fn subscribers_observe_dispatches_in_call_order() {
    let store = StreamStore::new();
    store.create_action("n", json!(0)).unwrap();
    let probe = ValueProbe::attach(&store, "n").unwrap();

    store.dispatch("n", json!("a")).unwrap();
    store.dispatch("n", json!("b")).unwrap();
    store.dispatch("n", json!("c")).unwrap();

    assert_eq!(
        probe.values(),
        vec![json!(0), json!("a"), json!("b"), json!("c")]
    );
}

#[test]
fn destroy_terminates_cleanly_and_frees_the_name() {
    let store = StreamStore::new();
    let events = EventCollector::attach(&store);

    store.create_action("n", json!(1)).unwrap();
    let probe = ValueProbe::attach(&store, "n").unwrap();
    store.destroy_action("n").unwrap();

    assert_eq!(store.read("n"), None);
    assert!(!store.is_registered("n"));
    assert_eq!(probe.values(), vec![json!(1)]);
    assert_eq!(events.kinds(), vec!["created", "triggered", "destroyed"]);

    // The name is reusable afterwards.
    store.create_action("n", json!(2)).unwrap();
    assert_eq!(store.read("n"), Some(json!(2)));
}

#[test]
fn effect_fires_immediately_and_once_per_dispatch() {
    let store = StreamStore::new();
    store.create_action("a", json!(1)).unwrap();
    let events = EventCollector::attach(&store);

    let fired = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = std::rc::Rc::clone(&fired);
    store
        .create_effect("a", move |value, _| sink.borrow_mut().push(value.clone()))
        .unwrap();

    assert_eq!(*fired.borrow(), vec![json!(1)]);
    assert_eq!(events.kinds_and_names(), vec![("effectTriggered", "a".into())]);

    store.dispatch("a", json!(2)).unwrap();
    store.dispatch("a", json!(3)).unwrap();

    assert_eq!(*fired.borrow(), vec![json!(1), json!(2), json!(3)]);
    let effect_events = events
        .kinds()
        .into_iter()
        .filter(|kind| *kind == "effectTriggered")
        .count();
    assert_eq!(effect_events, 3);
}

#[test]
fn feed_subscribers_each_get_the_full_sequence_from_attachment() {
    let store = StreamStore::new();
    let early = EventCollector::attach(&store);

    store.create_action("n", json!(1)).unwrap();
    let late = EventCollector::attach(&store);
    store.dispatch("n", json!(2)).unwrap();

    assert_eq!(early.kinds(), vec!["created", "triggered", "triggered"]);
    assert_eq!(late.kinds(), vec!["triggered"]);
}
