//! Action stream registry
//!
//! [`StreamStore`] owns the mapping from action name to its stream: a
//! [`Subject`] holding the current value and the stream's subscribers.
//! Every registry operation emits a lifecycle [`StoreEvent`] on a shared
//! broadcast feed, which the history recorder and any logger consume.
//!
//! Everything is synchronous and single-threaded: dispatches, subscriber
//! callbacks, and effects all run to completion on the caller's stack.
//! Effects receive a store handle and may dispatch again from inside a
//! dispatch; that reentrancy is plain recursion. To make it safe, the store
//! never holds its `RefCell` borrow while a user callback runs: mutations
//! happen in a short borrow scope, subscriber lists are snapshotted, and the
//! callbacks are invoked after the borrow is released.
//!
//! # Example
//! ```
//! use stream_store_core::StreamStore;
//! use serde_json::json;
//!
//! let store = StreamStore::new();
//! store.create_action("counter", json!(0)).unwrap();
//! store.dispatch("counter", json!(1)).unwrap();
//! assert_eq!(store.read("counter"), Some(json!(1)));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde_json::Value;
use tracing::debug;

use crate::error::StoreError;
use crate::event::StoreEvent;
use crate::subject::{Callback, Subject, SubscriberId};

struct Inner {
    /// Registered streams: name -> subject (current value + subscribers).
    actions: HashMap<String, Subject<Value>>,
    /// Broadcast feed for lifecycle events. Never replays to late
    /// subscribers.
    store_events: Subject<StoreEvent>,
}

/// The action stream registry.
///
/// Cheap to clone: clones share the same registry. The handle is
/// deliberately `!Send`; all ordering guarantees come from single-threaded
/// execution.
#[derive(Clone)]
pub struct StreamStore {
    inner: Rc<RefCell<Inner>>,
}

impl Default for StreamStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamStore {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                actions: HashMap::new(),
                store_events: Subject::new(),
            })),
        }
    }

    /// Register a new action stream and dispatch its initial value.
    ///
    /// Emits `created`, then runs the normal dispatch sequence with
    /// `initial`, so the stream's first data event is a `triggered` carrying
    /// its baseline value.
    ///
    /// Fails with [`StoreError::DuplicateName`] if `name` is already
    /// registered, in which case nothing is registered and no event is
    /// emitted.
    pub fn create_action(&self, name: &str, initial: Value) -> Result<(), StoreError> {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.actions.contains_key(name) {
                return Err(StoreError::DuplicateName(name.to_owned()));
            }
            inner.actions.insert(name.to_owned(), Subject::new());
        }
        self.emit(StoreEvent::Created {
            name: name.to_owned(),
        });
        self.dispatch(name, initial)
    }

    /// Publish a new value to a registered stream.
    ///
    /// In order: emits `triggered` (carrying the previous and new value) on
    /// the event feed, stores `payload` as the stream's current value, then
    /// delivers it synchronously to every subscriber in subscription order.
    ///
    /// A dispatched value is treated as immutable once stored; callers must
    /// never mutate it in place afterwards.
    ///
    /// Fails with [`StoreError::UnknownAction`] if `name` is not registered.
    pub fn dispatch(&self, name: &str, payload: Value) -> Result<(), StoreError> {
        let previous = {
            let inner = self.inner.borrow();
            let subject = inner
                .actions
                .get(name)
                .ok_or_else(|| StoreError::UnknownAction(name.to_owned()))?;
            subject.last().cloned()
        };

        self.emit(StoreEvent::Triggered {
            name: name.to_owned(),
            current: previous,
            changed: payload.clone(),
        });

        let subscribers = {
            let mut inner = self.inner.borrow_mut();
            match inner.actions.get_mut(name) {
                Some(subject) => {
                    subject.set_last(payload.clone());
                    subject.snapshot()
                }
                // A feed listener destroyed the stream while the `triggered`
                // event was being delivered. Destruction is terminal, so
                // nothing further is stored or delivered.
                None => Vec::new(),
            }
        };

        for callback in &subscribers {
            callback(&payload);
        }
        Ok(())
    }

    /// The current value of a stream.
    ///
    /// Non-failing: returns `None` for an unknown name.
    pub fn read(&self, name: &str) -> Option<Value> {
        self.inner
            .borrow()
            .actions
            .get(name)
            .and_then(|subject| subject.last().cloned())
    }

    /// Whether `name` is currently registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.inner.borrow().actions.contains_key(name)
    }

    /// Subscribe to a stream's values.
    ///
    /// The callback synchronously receives the stream's current value first
    /// (replay-on-subscribe), then every subsequently dispatched value until
    /// the subscription is dropped via [`Subscription::unsubscribe`] or the
    /// stream is destroyed.
    pub fn subscribe_to_action<F>(&self, name: &str, callback: F) -> Result<Subscription, StoreError>
    where
        F: Fn(&Value) + 'static,
    {
        self.attach(name, Rc::new(callback))
    }

    /// Register a side effect on a stream.
    ///
    /// The effect fires on every value the stream emits, including the
    /// immediate replay of the current value on attachment. Each firing is
    /// preceded by an `effectTriggered` event on the feed. The effect
    /// receives a registry handle and may dispatch to any stream, including
    /// the one it is attached to; such reentrant dispatches run as ordinary
    /// recursion and their events nest on the feed in call order.
    pub fn create_effect<F>(&self, name: &str, effect: F) -> Result<Subscription, StoreError>
    where
        F: Fn(&Value, &StreamStore) + 'static,
    {
        let weak = Rc::downgrade(&self.inner);
        let action = name.to_owned();
        let wrapped: Callback<Value> = Rc::new(move |value: &Value| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let store = StreamStore { inner };
            store.emit(StoreEvent::EffectTriggered {
                name: action.clone(),
            });
            effect(value, &store);
        });
        self.attach(name, wrapped)
    }

    /// Destroy a stream: complete it (clean termination, no further
    /// deliveries), remove it from the registry, and emit `destroyed`.
    ///
    /// Fails with [`StoreError::UnknownAction`] if `name` is not registered.
    pub fn destroy_action(&self, name: &str) -> Result<(), StoreError> {
        {
            let mut inner = self.inner.borrow_mut();
            let mut subject = inner
                .actions
                .remove(name)
                .ok_or_else(|| StoreError::UnknownAction(name.to_owned()))?;
            subject.complete();
        }
        self.emit(StoreEvent::Destroyed {
            name: name.to_owned(),
        });
        Ok(())
    }

    /// Subscribe to the lifecycle event feed.
    ///
    /// The listener receives every event emitted from this point on, in the
    /// exact global emission order. Nothing is buffered for late
    /// subscribers.
    pub fn store_events<F>(&self, listener: F) -> EventSubscription
    where
        F: Fn(&StoreEvent) + 'static,
    {
        let id = self
            .inner
            .borrow_mut()
            .store_events
            .subscribe(Rc::new(listener));
        EventSubscription {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Register a stream subscriber and replay the current value through it.
    fn attach(&self, name: &str, callback: Callback<Value>) -> Result<Subscription, StoreError> {
        let (id, replay) = {
            let mut inner = self.inner.borrow_mut();
            let subject = inner
                .actions
                .get_mut(name)
                .ok_or_else(|| StoreError::UnknownAction(name.to_owned()))?;
            (subject.subscribe(Rc::clone(&callback)), subject.last().cloned())
        };
        if let Some(value) = replay {
            callback(&value);
        }
        Ok(Subscription {
            inner: Rc::downgrade(&self.inner),
            name: name.to_owned(),
            id,
        })
    }

    /// Deliver an event to every feed listener, outside any borrow.
    fn emit(&self, event: StoreEvent) {
        debug!(kind = event.kind(), action = event.action(), "store event");
        let listeners = self.inner.borrow().store_events.snapshot();
        for callback in &listeners {
            callback(&event);
        }
    }
}

/// A live subscription to one action stream.
///
/// Dropping the handle does not unsubscribe; detaching is explicit via
/// [`unsubscribe`](Self::unsubscribe). Holds a weak reference to the
/// registry, so a handle outliving the store is a no-op.
#[derive(Debug)]
pub struct Subscription {
    inner: Weak<RefCell<Inner>>,
    name: String,
    id: SubscriberId,
}

impl Subscription {
    /// Detach the subscriber. Immediate and terminal.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.inner.upgrade() {
            if let Some(subject) = inner.borrow_mut().actions.get_mut(&self.name) {
                subject.unsubscribe(self.id);
            }
        }
    }

    /// The stream this subscription is attached to.
    pub fn action(&self) -> &str {
        &self.name
    }
}

/// A live subscription to the lifecycle event feed.
///
/// Like [`Subscription`], detaching is explicit; dropping the handle leaves
/// the listener attached.
pub struct EventSubscription {
    inner: Weak<RefCell<Inner>>,
    id: SubscriberId,
}

impl EventSubscription {
    /// Detach the listener. Immediate and terminal.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().store_events.unsubscribe(self.id);
        }
    }
}
