//! stream-store: named reactive action streams with time travel
//!
//! Each action stream holds a current value, replays it to new subscribers,
//! and broadcasts every dispatch. A shared lifecycle-event feed drives the
//! history recorder (append-only snapshots, point-in-time restore) and any
//! other observer, such as the tracing event logger.
//!
//! # Example
//! ```
//! use stream_store::prelude::*;
//! use serde_json::json;
//!
//! let store = StreamStore::new();
//! let history = StreamHistory::new(&store);
//!
//! store.create_action("cart", json!([])).unwrap();
//! store.dispatch("cart", json!(["apples"])).unwrap();
//!
//! assert_eq!(history.len(), 2);
//! history.restore_at(0).unwrap();
//! assert_eq!(store.read("cart"), Some(json!([])));
//! ```

// Re-export everything from core
pub use stream_store_core::*;

/// Prelude for convenient imports
pub mod prelude {
    pub use stream_store_core::prelude::*;
}
