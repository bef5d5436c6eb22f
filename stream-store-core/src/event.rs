//! Lifecycle events broadcast on the store event feed

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A lifecycle notification emitted by the registry.
///
/// Serializes to the documented wire shape
/// `{ "type": <kind>, "data": { "name", "current"?, "changed"? } }`:
///
/// ```
/// use stream_store_core::StoreEvent;
///
/// let event = StoreEvent::Created { name: "counter".into() };
/// let json = serde_json::to_value(&event).unwrap();
/// assert_eq!(json, serde_json::json!({"type": "created", "data": {"name": "counter"}}));
/// ```
///
/// Events are transient: the registry never stores them. Only a feed
/// subscriber (the history recorder, a logger) may persist them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum StoreEvent {
    /// A stream was registered. Always followed by the `Triggered` event of
    /// its initial dispatch.
    Created { name: String },
    /// A stream was completed and removed from the registry.
    Destroyed { name: String },
    /// A value was dispatched. `current` is the value being replaced
    /// (`None` for the initial dispatch), `changed` the incoming one.
    Triggered {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current: Option<Value>,
        changed: Value,
    },
    /// A registered effect is about to fire for this stream.
    EffectTriggered { name: String },
}

impl StoreEvent {
    /// The wire tag of this event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreEvent::Created { .. } => "created",
            StoreEvent::Destroyed { .. } => "destroyed",
            StoreEvent::Triggered { .. } => "triggered",
            StoreEvent::EffectTriggered { .. } => "effectTriggered",
        }
    }

    /// The action stream this event concerns.
    pub fn action(&self) -> &str {
        match self {
            StoreEvent::Created { name }
            | StoreEvent::Destroyed { name }
            | StoreEvent::Triggered { name, .. }
            | StoreEvent::EffectTriggered { name } => name,
        }
    }
}
