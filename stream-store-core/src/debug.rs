//! Store event logging with pattern-based filtering
//!
//! [`EventLogger`] is a plain observer over the lifecycle event feed: it
//! holds no state the store depends on and formats one `tracing` line per
//! event. [`EventLoggerConfig`] filters by action name with glob patterns,
//! and an optional in-memory ring buffer ([`EventLog`]) keeps the most
//! recent events around for inspection.
//!
//! # Example
//!
//! ```
//! use stream_store_core::debug::{EventLogger, EventLoggerConfig};
//! use stream_store_core::StreamStore;
//! use serde_json::json;
//!
//! let store = StreamStore::new();
//!
//! // Log everything except tick-style noise.
//! let config = EventLoggerConfig::new(None, Some("tick,frame*"));
//! let logger = EventLogger::with_config(&store, config);
//!
//! store.create_action("counter", json!(0)).unwrap();
//! logger.detach();
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::info;

use crate::event::StoreEvent;
use crate::store::{EventSubscription, StreamStore};

/// Filter config for event logging, matching on action names.
///
/// Patterns support `*` (any sequence) and `?` (any single character).
/// With include patterns set, an action must match at least one; exclude
/// patterns are applied afterwards. The default config logs everything.
#[derive(Debug, Clone, Default)]
pub struct EventLoggerConfig {
    /// If non-empty, only log actions matching these patterns.
    pub include_patterns: Vec<String>,
    /// Exclude actions matching these patterns (applied after include).
    pub exclude_patterns: Vec<String>,
}

impl EventLoggerConfig {
    /// Build a config from comma-separated pattern strings.
    ///
    /// ```
    /// use stream_store_core::debug::EventLoggerConfig;
    ///
    /// let config = EventLoggerConfig::new(Some("cart*,user"), Some("cart-internal"));
    /// assert!(config.should_log("cart-items"));
    /// assert!(config.should_log("user"));
    /// assert!(!config.should_log("cart-internal"));
    /// assert!(!config.should_log("session"));
    /// ```
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Self {
        let split = |patterns: &str| {
            patterns
                .split(',')
                .map(|pattern| pattern.trim().to_string())
                .collect()
        };
        Self {
            include_patterns: include.map(split).unwrap_or_default(),
            exclude_patterns: exclude.map(split).unwrap_or_default(),
        }
    }

    /// Create a config with explicit pattern vectors.
    pub fn with_patterns(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            include_patterns: include,
            exclude_patterns: exclude,
        }
    }

    /// Whether events for `action_name` pass the filter.
    pub fn should_log(&self, action_name: &str) -> bool {
        if !self.include_patterns.is_empty()
            && !self
                .include_patterns
                .iter()
                .any(|pattern| glob_match(pattern, action_name))
        {
            return false;
        }
        !self
            .exclude_patterns
            .iter()
            .any(|pattern| glob_match(pattern, action_name))
    }
}

/// Glob matching over `*` (zero or more characters) and `?` (exactly one).
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    glob_match_impl(&pattern, &text)
}

fn glob_match_impl(pattern: &[char], text: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some((&'*', rest)) => (0..=text.len()).any(|skip| glob_match_impl(rest, &text[skip..])),
        Some((&'?', rest)) => !text.is_empty() && glob_match_impl(rest, &text[1..]),
        Some((ch, rest)) => text.first() == Some(ch) && glob_match_impl(rest, &text[1..]),
    }
}

// ============================================================================
// In-memory event log
// ============================================================================

/// One recorded lifecycle event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventLogEntry {
    /// Event kind tag (`created`, `triggered`, ...).
    pub kind: &'static str,
    /// Action name the event concerns.
    pub action: String,
    /// Monotonic sequence number, not reset when old entries are evicted.
    pub sequence: u64,
}

/// Bounded ring buffer of recent store events, oldest evicted first.
#[derive(Debug)]
pub struct EventLog {
    entries: VecDeque<EventLogEntry>,
    capacity: usize,
    next_sequence: u64,
}

impl EventLog {
    /// Create a log retaining at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_sequence: 0,
        }
    }

    /// Record one event.
    pub fn record(&mut self, event: &StoreEvent) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(EventLogEntry {
            kind: event.kind(),
            action: event.action().to_owned(),
            sequence: self.next_sequence,
        });
        self.next_sequence += 1;
    }

    /// All retained entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &EventLogEntry> {
        self.entries.iter()
    }

    /// The most recent `count` entries, newest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &EventLogEntry> {
        self.entries.iter().rev().take(count)
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all retained entries. Sequence numbering continues.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// ============================================================================
// Logger
// ============================================================================

/// Formats lifecycle events as `tracing` output.
///
/// Purely an observer: consumes the event feed read-only and holds no
/// contract with the store beyond that.
pub struct EventLogger {
    subscription: EventSubscription,
    log: Option<Rc<RefCell<EventLog>>>,
}

impl EventLogger {
    /// Attach with the default (log-everything) config, tracing output only.
    pub fn attach(store: &StreamStore) -> Self {
        Self::with_config(store, EventLoggerConfig::default())
    }

    /// Attach with a filter config, tracing output only.
    pub fn with_config(store: &StreamStore, config: EventLoggerConfig) -> Self {
        Self::build(store, config, None)
    }

    /// Attach with a filter config plus an in-memory ring buffer of
    /// `capacity` entries.
    pub fn with_log(store: &StreamStore, config: EventLoggerConfig, capacity: usize) -> Self {
        Self::build(store, config, Some(capacity))
    }

    fn build(store: &StreamStore, config: EventLoggerConfig, capacity: Option<usize>) -> Self {
        let log = capacity.map(|capacity| Rc::new(RefCell::new(EventLog::with_capacity(capacity))));
        let sink = log.clone();
        let subscription = store.store_events(move |event| {
            if !config.should_log(event.action()) {
                return;
            }
            match event {
                StoreEvent::Created { name } => info!(action = %name, "action created"),
                StoreEvent::Destroyed { name } => info!(action = %name, "action destroyed"),
                StoreEvent::Triggered {
                    name,
                    current,
                    changed,
                } => info!(action = %name, previous = ?current, value = %changed, "action triggered"),
                StoreEvent::EffectTriggered { name } => info!(action = %name, "effect triggered"),
            }
            if let Some(log) = &sink {
                log.borrow_mut().record(event);
            }
        });
        Self { subscription, log }
    }

    /// The in-memory log, if one was requested.
    pub fn log(&self) -> Option<Rc<RefCell<EventLog>>> {
        self.log.clone()
    }

    /// Stop observing the feed.
    pub fn detach(self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn glob_match_exact() {
        assert!(glob_match("counter", "counter"));
        assert!(!glob_match("counter", "counters"));
        assert!(!glob_match("counter", "count"));
    }

    #[test]
    fn glob_match_star() {
        assert!(glob_match("cart*", "cart-items"));
        assert!(glob_match("cart*", "cart"));
        assert!(!glob_match("cart*", "my-cart"));
        assert!(glob_match("*cart", "my-cart"));
        assert!(glob_match("*cart*", "my-cart-items"));
    }

    #[test]
    fn glob_match_question() {
        assert!(glob_match("tick?", "ticks"));
        assert!(!glob_match("tick?", "tick"));
        assert!(!glob_match("tick?", "tickss"));
    }

    #[test]
    fn config_include_and_exclude() {
        let config = EventLoggerConfig::new(Some("cart*"), Some("cart-internal*"));
        assert!(config.should_log("cart-items"));
        assert!(!config.should_log("cart-internal-state"));
        assert!(!config.should_log("user"));
    }

    #[test]
    fn default_config_logs_everything() {
        let config = EventLoggerConfig::default();
        assert!(config.should_log("anything"));
    }

    #[test]
    fn event_log_records_and_evicts() {
        let mut log = EventLog::with_capacity(2);
        log.record(&StoreEvent::Created { name: "a".into() });
        log.record(&StoreEvent::Triggered {
            name: "a".into(),
            current: None,
            changed: json!(1),
        });
        log.record(&StoreEvent::Destroyed { name: "a".into() });

        assert_eq!(log.len(), 2);
        // Oldest entry evicted; sequence numbering keeps going.
        let kinds: Vec<_> = log.entries().map(|entry| entry.kind).collect();
        assert_eq!(kinds, vec!["triggered", "destroyed"]);
        assert_eq!(log.entries().next().unwrap().sequence, 1);

        let newest: Vec<_> = log.recent(1).map(|entry| entry.kind).collect();
        assert_eq!(newest, vec!["destroyed"]);
    }

    #[test]
    fn logger_buffers_filtered_events() {
        let store = StreamStore::new();
        let config = EventLoggerConfig::new(Some("counter"), None);
        let logger = EventLogger::with_log(&store, config, 16);

        store.create_action("counter", json!(0)).unwrap();
        store.create_action("other", json!(0)).unwrap();
        store.dispatch("counter", json!(1)).unwrap();

        let log = logger.log().unwrap();
        let entries: Vec<_> = log
            .borrow()
            .entries()
            .map(|entry| (entry.kind, entry.action.clone()))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("created", "counter".to_string()),
                ("triggered", "counter".to_string()),
                ("triggered", "counter".to_string()),
            ]
        );
    }

    #[test]
    fn detached_logger_stops_recording() {
        let store = StreamStore::new();
        let logger = EventLogger::with_log(&store, EventLoggerConfig::default(), 16);
        let log = logger.log().unwrap();

        store.create_action("counter", json!(0)).unwrap();
        let before = log.borrow().len();
        logger.detach();
        store.dispatch("counter", json!(1)).unwrap();

        assert_eq!(log.borrow().len(), before);
    }
}
