//! Rolling action log with best-effort external analytics dispatch.
//!
//! Every recorded action lands in a capped local log and, when tracking is
//! enabled, is forwarded to an optional external sink. A circuit breaker
//! permanently stops dispatch for the session after too many consecutive
//! sink failures, so a broken integration can never slow or crash the host.

use chrono::Local;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::SinkError;
use crate::keys::TRACKING_HISTORY;
use crate::store::SharedStore;

/// Maximum number of retained action entries, newest first.
pub const ACTION_LOG_CAP: usize = 100;

/// Consecutive dispatch failures before the circuit breaker opens for good.
pub const MAX_DISPATCH_FAILURES: u32 = 5;

/// One logged user action with a display timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub date: String,
    pub action: String,
}

/// External analytics destination. Implementations must not block for long;
/// failures are counted by the circuit breaker.
pub trait AnalyticsSink: Send {
    fn dispatch(&self, event: &str, params: &Map<String, JsonValue>) -> Result<(), SinkError>;
}

type Observer = Box<dyn Fn(&[ActionEntry]) + Send>;

/// The action log plus its dispatch circuit breaker.
///
/// Constructed once at startup and injected wherever recording is needed;
/// the breaker state lives here rather than in a global so tests get fresh
/// instances.
pub struct ActionLog {
    store: SharedStore,
    sink: Option<Box<dyn AnalyticsSink>>,
    enabled: bool,
    failures: u32,
    dead: bool,
    sink_missing_reported: bool,
    observers: Vec<Observer>,
}

impl ActionLog {
    pub fn new(store: SharedStore, sink: Option<Box<dyn AnalyticsSink>>, enabled: bool) -> Self {
        Self {
            store,
            sink,
            enabled,
            failures: 0,
            dead: false,
            sink_missing_reported: false,
            observers: Vec::new(),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the circuit breaker has permanently disabled dispatch.
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Registers a callback invoked with the updated log after each
    /// successful append, e.g. for a live-updating panel.
    pub fn subscribe(&mut self, observer: impl Fn(&[ActionEntry]) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Current log, newest first.
    pub fn entries(&self) -> Vec<ActionEntry> {
        self.store.get_json(TRACKING_HISTORY, Vec::new())
    }

    /// Records an action with no extra parameters.
    pub fn record(&mut self, action: &str) {
        self.record_with(action, Map::new());
    }

    /// Records an action: prepends a timestamped entry, truncates to the
    /// cap, persists, notifies observers, then attempts external dispatch.
    /// A persistence failure abandons the append; the untouched stored log
    /// stays consistent. A no-op while tracking is disabled.
    pub fn record_with(&mut self, action: &str, params: Map<String, JsonValue>) {
        if !self.enabled {
            return;
        }

        let mut entries = self.entries();
        entries.insert(
            0,
            ActionEntry {
                date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                action: action.to_string(),
            },
        );
        entries.truncate(ACTION_LOG_CAP);
        if self.store.set_json(TRACKING_HISTORY, &entries) {
            for observer in &self.observers {
                observer(&entries);
            }
        } else {
            warn!("action log append abandoned for \"{action}\"");
        }

        self.dispatch_external(action, &params);
    }

    /// Forwards an event to the external sink, if dispatch is still alive.
    ///
    /// A missing sink is reported once per session. Sink failures increment
    /// a consecutive-failure counter (reset on success); at
    /// [`MAX_DISPATCH_FAILURES`] the dispatcher goes permanently dead for
    /// the rest of the session.
    pub fn dispatch_external(&mut self, event: &str, params: &Map<String, JsonValue>) {
        if self.dead {
            return;
        }
        let Some(sink) = &self.sink else {
            if !self.sink_missing_reported {
                error!("analytics sink missing; external dispatch disabled");
                self.sink_missing_reported = true;
            }
            return;
        };
        match sink.dispatch(event, params) {
            Ok(()) => self.failures = 0,
            Err(e) => {
                self.failures += 1;
                if self.failures <= MAX_DISPATCH_FAILURES {
                    error!("analytics dispatch failed: {e}");
                }
                if self.failures >= MAX_DISPATCH_FAILURES {
                    self.dead = true;
                    error!(
                        "analytics dispatch permanently disabled after {MAX_DISPATCH_FAILURES} consecutive failures"
                    );
                }
            }
        }
    }
}
