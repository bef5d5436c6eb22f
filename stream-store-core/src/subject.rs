//! Replay-latest publish/subscribe primitive
//!
//! A [`Subject`] is the broadcast building block the registry is made of:
//! an ordered subscriber list, a cache of the last published value, and a
//! terminal `complete` state. Fan-out is synchronous and happens in
//! subscription order.

use std::rc::Rc;

/// Identifies a subscriber for later removal.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SubscriberId(u64);

/// A boxed subscriber callback.
pub type Callback<T> = Rc<dyn Fn(&T)>;

/// A broadcast channel with a last-value cache.
///
/// Subscribers are invoked synchronously, in the order they subscribed.
/// Completing a subject is terminal: all subscribers are dropped and no
/// further values are delivered.
pub struct Subject<T> {
    subscribers: Vec<(SubscriberId, Callback<T>)>,
    last: Option<T>,
    next_id: u64,
    completed: bool,
}

impl<T> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Subject<T> {
    /// Create an empty subject with no cached value.
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            last: None,
            next_id: 0,
            completed: false,
        }
    }

    /// Register a subscriber callback.
    ///
    /// Subscribing to a completed subject is a no-op: the returned id is
    /// valid but the callback is never invoked.
    pub fn subscribe(&mut self, callback: Callback<T>) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        if !self.completed {
            self.subscribers.push((id, callback));
        }
        id
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    /// The last published value, if any.
    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }

    /// Overwrite the last-value cache without notifying subscribers.
    ///
    /// Together with [`snapshot`](Self::snapshot) this is the split form of
    /// [`publish`](Self::publish), used when subscriber callbacks must run
    /// after an outer borrow has been released.
    pub fn set_last(&mut self, value: T) {
        self.last = Some(value);
    }

    /// Clone out the current subscriber callbacks, in subscription order.
    pub fn snapshot(&self) -> Vec<Callback<T>> {
        self.subscribers
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect()
    }

    /// Cache `value` and deliver it to every subscriber, in subscription
    /// order. No-op once completed.
    pub fn publish(&mut self, value: T) {
        if self.completed {
            return;
        }
        let subscribers = self.snapshot();
        // Cache before delivery so a subscriber observing the subject
        // mid-delivery sees the new value.
        self.last = Some(value);
        if let Some(value) = self.last.as_ref() {
            for callback in &subscribers {
                callback(value);
            }
        }
    }

    /// Terminate the subject: drop all subscribers, deliver nothing further.
    ///
    /// The last-value cache is kept so late readers can still inspect the
    /// final value.
    pub fn complete(&mut self) {
        self.completed = true;
        self.subscribers.clear();
    }

    /// Whether [`complete`](Self::complete) has been called.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
