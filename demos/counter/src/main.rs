//! Counter - minimal stream-store walkthrough
//!
//! Shows the whole API in one file:
//! - create a named action stream with an initial value
//! - subscribe (new subscribers replay the current value)
//! - attach an effect that dispatches to another stream
//! - record history and travel back to an earlier snapshot

use serde_json::json;
use stream_store::debug::EventLogger;
use stream_store::prelude::*;

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let store = StreamStore::new();
    let history = StreamHistory::new(&store);
    let _logger = EventLogger::attach(&store);

    store.create_action("counter", json!(0)).unwrap();
    store.create_action("parity", json!("even")).unwrap();

    // Keep "parity" in sync with "counter". Fires immediately with the
    // replayed current value, then once per dispatch.
    store
        .create_effect("counter", |value, store| {
            let n = value.as_i64().unwrap_or(0);
            let parity = if n % 2 == 0 { "even" } else { "odd" };
            store.dispatch("parity", json!(parity)).unwrap();
        })
        .unwrap();

    let subscription = store
        .subscribe_to_action("counter", |value| {
            println!("counter -> {value}");
        })
        .unwrap();

    for n in 1..=3 {
        store.dispatch("counter", json!(n)).unwrap();
    }
    println!(
        "counter = {}, parity = {}",
        store.read("counter").unwrap(),
        store.read("parity").unwrap()
    );

    println!("history has {} snapshots", history.len());
    println!("last snapshot: {:?}", history.last_snapshot().unwrap());

    // Travel back to the moment the counter first became 1.
    let target = history
        .full_history()
        .iter()
        .position(|snapshot| snapshot.get("counter") == Some(&json!(1)))
        .expect("counter reached 1");
    history.restore_at(target).unwrap();
    println!(
        "after restore: counter = {}, parity = {}",
        store.read("counter").unwrap(),
        store.read("parity").unwrap()
    );

    subscription.unsubscribe();
    store.destroy_action("counter").unwrap();
    store.destroy_action("parity").unwrap();
}
