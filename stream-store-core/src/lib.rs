//! Core types for stream-store
//!
//! A minimal reactive state container: named action streams each hold a
//! current value, broadcast updates to subscribers, and support registered
//! side effects. Lifecycle events for every registry operation go out on a
//! shared feed, on top of which an append-only history recorder provides
//! point-in-time lookup and restoration.
//!
//! # Core Concepts
//!
//! - **StreamStore**: the registry of named action streams
//! - **Dispatch**: publish a new value to a named stream
//! - **Subject**: the replay-latest pub/sub primitive streams are built on
//! - **StoreEvent**: lifecycle notifications (`created`, `destroyed`,
//!   `triggered`, `effectTriggered`) on a shared broadcast feed
//! - **StreamHistory**: append-only full-state snapshots with time travel
//!
//! # Basic Example
//!
//! ```
//! use stream_store_core::{StreamHistory, StreamStore};
//! use serde_json::json;
//!
//! let store = StreamStore::new();
//! let history = StreamHistory::new(&store);
//!
//! store.create_action("counter", json!(0)).unwrap();
//! store.create_effect("counter", |value, _store| {
//!     println!("counter is now {value}");
//! }).unwrap();
//!
//! store.dispatch("counter", json!(1)).unwrap();
//! assert_eq!(store.read("counter"), Some(json!(1)));
//!
//! history.restore_at(0).unwrap();
//! assert_eq!(store.read("counter"), Some(json!(0)));
//! ```
//!
//! The engine is synchronous and single-threaded by design: every dispatch,
//! subscriber callback, and effect runs to completion on the caller's stack,
//! and all ordering guarantees follow from that. Effects receive a store
//! handle and may dispatch reentrantly.

pub mod debug;
pub mod error;
pub mod event;
pub mod history;
pub mod store;
pub mod subject;
pub mod testing;

pub use error::StoreError;
pub use event::StoreEvent;
pub use history::{Snapshot, StreamHistory};
pub use store::{EventSubscription, StreamStore, Subscription};
pub use subject::{Subject, SubscriberId};

// Re-export the payload type for convenience
pub use serde_json::Value;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::debug::{EventLogger, EventLoggerConfig};
    pub use crate::error::StoreError;
    pub use crate::event::StoreEvent;
    pub use crate::history::{Snapshot, StreamHistory};
    pub use crate::store::{EventSubscription, StreamStore, Subscription};
    pub use crate::subject::{Subject, SubscriberId};
    pub use serde_json::Value;
}
