//! Named usage counters with one-time milestone events.
//!
//! A counter is a persisted monotonic integer; its milestone set records
//! which thresholds have already fired so each fires exactly once across
//! session reloads.

use log::warn;

use crate::keys::{counter_milestones_key, counter_value_key};
use crate::store::SharedStore;

/// The stock threshold ladder used for usage counters.
pub const DEFAULT_MILESTONES: [u64; 6] = [5, 10, 50, 100, 1000, 10000];

/// Result of one increment: the counter value after the bump and the
/// thresholds that crossed for the first time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneOutcome {
    pub value: u64,
    pub fired: Vec<u64>,
}

/// Increments named counters and detects first-time threshold crossings.
///
/// Persistence failures are logged and do not roll back the reported
/// outcome: the event is still signalled, the counter is simply not durably
/// advanced.
pub struct CounterMilestoneTracker {
    store: SharedStore,
}

impl CounterMilestoneTracker {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Current persisted value of a counter, 0 when unset.
    pub fn value(&self, name: &str) -> u64 {
        self.store.get_json(&counter_value_key(name), 0)
    }

    /// Thresholds already fired for a counter.
    pub fn reached(&self, name: &str) -> Vec<u64> {
        self.store.get_json(&counter_milestones_key(name), Vec::new())
    }

    /// Adds 1 to the counter, persists it, and fires each threshold in
    /// `thresholds` at most once over the counter's lifetime. The milestone
    /// set is persisted once after all threshold checks.
    pub fn increment(&self, name: &str, thresholds: &[u64]) -> MilestoneOutcome {
        let value_key = counter_value_key(name);
        let new_value = self.store.get_json::<u64>(&value_key, 0) + 1;
        if !self.store.set_json(&value_key, &new_value) {
            warn!("counter \"{name}\" not durably advanced to {new_value}");
        }

        let milestones_key = counter_milestones_key(name);
        let mut reached: Vec<u64> = self.store.get_json(&milestones_key, Vec::new());
        let mut fired = Vec::new();
        for &threshold in thresholds {
            if new_value >= threshold && !reached.contains(&threshold) {
                reached.push(threshold);
                fired.push(threshold);
            }
        }
        if !self.store.set_json(&milestones_key, &reached) {
            warn!("milestone set for \"{name}\" not durably updated");
        }

        MilestoneOutcome {
            value: new_value,
            fired,
        }
    }
}
