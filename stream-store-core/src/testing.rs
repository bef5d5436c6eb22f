//! Test helpers for code built on the store
//!
//! [`EventCollector`] buffers every lifecycle event for assertion and
//! [`ValueProbe`] buffers every value a stream delivers to a subscription
//! (replay included). Both are used by this crate's own suites and exported
//! for downstream tests.
//!
//! # Example
//!
//! ```
//! use stream_store_core::testing::{EventCollector, ValueProbe};
//! use stream_store_core::StreamStore;
//! use serde_json::json;
//!
//! let store = StreamStore::new();
//! let events = EventCollector::attach(&store);
//!
//! store.create_action("counter", json!(0)).unwrap();
//! let probe = ValueProbe::attach(&store, "counter").unwrap();
//! store.dispatch("counter", json!(1)).unwrap();
//!
//! assert_eq!(events.kinds(), vec!["created", "triggered", "triggered"]);
//! assert_eq!(probe.values(), vec![json!(0), json!(1)]);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use crate::error::StoreError;
use crate::event::StoreEvent;
use crate::store::{EventSubscription, StreamStore, Subscription};

/// Buffers every event on the store's lifecycle feed.
pub struct EventCollector {
    events: Rc<RefCell<Vec<StoreEvent>>>,
    subscription: EventSubscription,
}

impl EventCollector {
    /// Start collecting events emitted from this point on.
    pub fn attach(store: &StreamStore) -> Self {
        let events: Rc<RefCell<Vec<StoreEvent>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let subscription = store.store_events(move |event| sink.borrow_mut().push(event.clone()));
        Self {
            events,
            subscription,
        }
    }

    /// All collected events, in emission order.
    pub fn events(&self) -> Vec<StoreEvent> {
        self.events.borrow().clone()
    }

    /// The kind tags of all collected events, in emission order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(StoreEvent::kind).collect()
    }

    /// The `(kind, action)` pairs of all collected events.
    pub fn kinds_and_names(&self) -> Vec<(&'static str, String)> {
        self.events
            .borrow()
            .iter()
            .map(|event| (event.kind(), event.action().to_owned()))
            .collect()
    }

    /// Number of collected events.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Forget everything collected so far; keeps collecting.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Stop collecting and return everything collected.
    pub fn detach(self) -> Vec<StoreEvent> {
        self.subscription.unsubscribe();
        self.events.borrow().clone()
    }
}

/// Buffers every value one action stream delivers to a subscription,
/// starting with the replayed current value.
#[derive(Debug)]
pub struct ValueProbe {
    values: Rc<RefCell<Vec<Value>>>,
    subscription: Subscription,
}

impl ValueProbe {
    /// Subscribe to `name` and start buffering.
    pub fn attach(store: &StreamStore, name: &str) -> Result<Self, StoreError> {
        let values: Rc<RefCell<Vec<Value>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&values);
        let subscription =
            store.subscribe_to_action(name, move |value| sink.borrow_mut().push(value.clone()))?;
        Ok(Self {
            values,
            subscription,
        })
    }

    /// All delivered values, in delivery order.
    pub fn values(&self) -> Vec<Value> {
        self.values.borrow().clone()
    }

    /// The most recently delivered value.
    pub fn last(&self) -> Option<Value> {
        self.values.borrow().last().cloned()
    }

    /// Number of delivered values.
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    /// Whether nothing has been delivered.
    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    /// Unsubscribe from the stream.
    pub fn detach(self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collector_records_in_emission_order() {
        let store = StreamStore::new();
        let events = EventCollector::attach(&store);

        store.create_action("a", json!(1)).unwrap();
        store.destroy_action("a").unwrap();

        assert_eq!(events.kinds(), vec!["created", "triggered", "destroyed"]);
        assert_eq!(events.len(), 3);

        events.clear();
        assert!(events.is_empty());
    }

    #[test]
    fn detach_returns_everything_collected() {
        let store = StreamStore::new();
        let events = EventCollector::attach(&store);

        store.create_action("a", json!(1)).unwrap();
        let collected = events.detach();

        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].kind(), "created");
    }

    #[test]
    fn probe_buffers_replay_and_dispatches() {
        let store = StreamStore::new();
        store.create_action("a", json!(1)).unwrap();

        let probe = ValueProbe::attach(&store, "a").unwrap();
        store.dispatch("a", json!(2)).unwrap();

        assert_eq!(probe.values(), vec![json!(1), json!(2)]);
        assert_eq!(probe.last(), Some(json!(2)));
        assert_eq!(probe.len(), 2);
    }
}
