//! Append-only history of full-state snapshots
//!
//! [`StreamHistory`] subscribes to the store's lifecycle event feed and
//! materializes one snapshot per state change: a `triggered` event appends
//! the previous snapshot with the stream's new value set, a `destroyed`
//! event appends it with the stream removed. `created` appends nothing (the
//! stream's baseline arrives through the initial `triggered` it is always
//! paired with), and `effectTriggered` is ignored.
//!
//! Snapshots are never mutated after being appended; each is derived from
//! its predecessor by copy.
//!
//! # Example
//! ```
//! use stream_store_core::{StreamHistory, StreamStore};
//! use serde_json::json;
//!
//! let store = StreamStore::new();
//! let history = StreamHistory::new(&store);
//!
//! store.create_action("counter", json!(1)).unwrap();
//! store.dispatch("counter", json!(2)).unwrap();
//!
//! assert_eq!(history.len(), 2);
//! store.dispatch("counter", json!(3)).unwrap();
//! history.restore_at(0).unwrap();
//! assert_eq!(store.read("counter"), Some(json!(1)));
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;

use crate::error::StoreError;
use crate::event::StoreEvent;
use crate::store::{EventSubscription, StreamStore};

/// A full mapping of action names to their values at one point in the event
/// timeline. `BTreeMap` keeps key iteration (and thus restore order)
/// deterministic.
pub type Snapshot = BTreeMap<String, Value>;

/// Records store state over time and can re-dispatch any recorded point.
pub struct StreamHistory {
    snapshots: Rc<RefCell<Vec<Snapshot>>>,
    store: StreamStore,
    subscription: Option<EventSubscription>,
}

impl StreamHistory {
    /// Attach a recorder to `store`. Recording starts with the events
    /// emitted after this call; nothing is backfilled.
    pub fn new(store: &StreamStore) -> Self {
        let snapshots: Rc<RefCell<Vec<Snapshot>>> = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&snapshots);
        let subscription = store.store_events(move |event| {
            let mut snapshots = log.borrow_mut();
            let mut next = snapshots.last().cloned().unwrap_or_default();
            match event {
                StoreEvent::Triggered { name, changed, .. } => {
                    next.insert(name.clone(), changed.clone());
                    snapshots.push(next);
                }
                StoreEvent::Destroyed { name } => {
                    next.remove(name);
                    snapshots.push(next);
                }
                StoreEvent::Created { .. } | StoreEvent::EffectTriggered { .. } => {}
            }
        });

        Self {
            snapshots,
            store: store.clone(),
            subscription: Some(subscription),
        }
    }

    /// Number of recorded snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.borrow().len()
    }

    /// Whether nothing has been recorded (or everything was disposed).
    pub fn is_empty(&self) -> bool {
        self.snapshots.borrow().is_empty()
    }

    /// The most recent snapshot, if any.
    pub fn last_snapshot(&self) -> Option<Snapshot> {
        self.snapshots.borrow().last().cloned()
    }

    /// The snapshot at `index` (0 = earliest).
    ///
    /// Fails with [`StoreError::IndexOutOfRange`] if no such entry exists.
    pub fn snapshot_at(&self, index: usize) -> Result<Snapshot, StoreError> {
        self.snapshots
            .borrow()
            .get(index)
            .cloned()
            .ok_or(StoreError::IndexOutOfRange(index))
    }

    /// The entire ordered log, earliest first.
    pub fn full_history(&self) -> Vec<Snapshot> {
        self.snapshots.borrow().clone()
    }

    /// Re-dispatch every value in snapshot `index` against the live store,
    /// in key iteration order.
    ///
    /// Restoring never recreates destroyed streams: a name in the snapshot
    /// that is no longer registered surfaces as
    /// [`StoreError::UnknownAction`] from the underlying dispatch, aborting
    /// the remaining re-dispatches. The re-dispatches themselves are
    /// recorded, so the log keeps growing.
    pub fn restore_at(&self, index: usize) -> Result<(), StoreError> {
        let snapshot = self.snapshot_at(index)?;
        for (name, value) in &snapshot {
            self.store.dispatch(name, value.clone())?;
        }
        Ok(())
    }

    /// Drop all retained snapshots and stop recording. Idempotent.
    pub fn dispose(&mut self) {
        self.snapshots.borrow_mut().clear();
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl Drop for StreamHistory {
    fn drop(&mut self) {
        self.dispose();
    }
}
