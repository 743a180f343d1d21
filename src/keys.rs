//! Storage key namespace.
//!
//! Key names are an internal namespace; the portable snapshot format uses
//! its own stable field names (see [`crate::snapshot::Snapshot`]).

/// The document currently loaded in the editor.
pub const CURRENT_JSON: &str = "currentJson";

/// The capped prompt history list.
pub const JSON_HISTORY: &str = "jsonHistory";

/// The rolling log of recent user actions.
pub const TRACKING_HISTORY: &str = "trackingHistory";

/// Per-section preset map.
pub const SECTION_PRESETS: &str = "sectionPresets";

/// Legacy flat preset map kept for snapshot compatibility.
pub const PRESETS: &str = "presets";

/// User-supplied custom value lists, keyed by field.
pub const CUSTOM_VALUES: &str = "customValues";

/// The fixed set of preference keys included in an exported snapshot.
pub const PREFERENCE_KEYS: &[&str] = &[
    "darkMode",
    "darkModeToggleVisible",
    "locale",
    "trackingEnabled",
    "keyboardShortcutsEnabled",
    "headerVisible",
    "copyLabelsEnabled",
    "coreActionLabelsOnly",
    "undoRedoLabelsEnabled",
    "floatingJsonEnabled",
    "temporaryMode",
    "customCss",
    "customJs",
    "totalSeconds",
];

/// Keys removed by a local cache purge.
pub const PURGE_KEYS: &[&str] = &[
    CURRENT_JSON,
    JSON_HISTORY,
    TRACKING_HISTORY,
    "githubStats",
    "githubStatsTimestamp",
];

/// Key holding the persisted value of a named counter.
pub fn counter_value_key(name: &str) -> String {
    format!("{name}Count")
}

/// Key holding the set of milestone thresholds already fired for a counter.
pub fn counter_milestones_key(name: &str) -> String {
    format!("{name}Milestones")
}
