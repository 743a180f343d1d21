//! Portable snapshot of the persisted application state.
//!
//! A [`Snapshot`] is always a fresh projection of the store at the moment of
//! export; import is an additive per-field merge that never clears fields
//! the incoming snapshot does not supply. Unknown incoming fields and
//! wrong-shaped known fields are ignored, so the format stays
//! forward-compatible.

use std::collections::BTreeMap;

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::history::HistoryEntry;
use crate::keys::{
    CURRENT_JSON, CUSTOM_VALUES, JSON_HISTORY, PREFERENCE_KEYS, PRESETS, SECTION_PRESETS,
};
use crate::presets::{CustomValues, Preset, SectionPresets};
use crate::store::SharedStore;

/// The snapshot wire format. Field names are stable and independent of the
/// internal storage key namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(
        rename = "currentJson",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_json: Option<String>,
    #[serde(
        rename = "jsonHistory",
        default,
        deserialize_with = "lenient_entries",
        skip_serializing_if = "Option::is_none"
    )]
    pub json_history: Option<Vec<HistoryEntry>>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub preferences: Option<BTreeMap<String, JsonValue>>,
    #[serde(
        rename = "sectionPresets",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub section_presets: Option<SectionPresets>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub presets: Option<BTreeMap<String, JsonValue>>,
    #[serde(
        rename = "customValues",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_values: Option<CustomValues>,
}

/// Deserializes a field but treats a wrong-shaped value like an absent one,
/// so a single bad field never aborts the whole snapshot.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Like [`lenient`], with per-item leniency: malformed history entries are
/// skipped instead of dropping the whole list.
fn lenient_entries<'de, D>(deserializer: D) -> Result<Option<Vec<HistoryEntry>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match value {
        Some(JsonValue::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

/// Exports and imports [`Snapshot`]s against the key-value store.
pub struct SnapshotCodec {
    store: SharedStore,
}

impl SnapshotCodec {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Assembles a snapshot from the store. Absent keys are omitted, never
    /// emitted as null placeholders.
    pub fn export(&self) -> Snapshot {
        let mut preferences = BTreeMap::new();
        for &key in PREFERENCE_KEYS {
            if let Some(raw) = self.store.get_opt(key) {
                preferences.insert(key.to_string(), preference_to_value(raw));
            }
        }

        Snapshot {
            current_json: self.store.get_opt(CURRENT_JSON),
            json_history: self
                .store
                .get_opt(JSON_HISTORY)
                .map(|_| self.store.get_json(JSON_HISTORY, Vec::new())),
            preferences: (!preferences.is_empty()).then_some(preferences),
            section_presets: self
                .store
                .get_opt(SECTION_PRESETS)
                .map(|_| self.store.get_json(SECTION_PRESETS, SectionPresets::new())),
            presets: self
                .store
                .get_opt(PRESETS)
                .map(|_| self.store.get_json(PRESETS, BTreeMap::new())),
            custom_values: self
                .store
                .get_opt(CUSTOM_VALUES)
                .map(|_| self.store.get_json(CUSTOM_VALUES, CustomValues::new())),
        }
    }

    /// Overwrites store keys for each field the snapshot supplies; absent
    /// fields leave existing state untouched. Returns `true` when at least
    /// one field was applied.
    pub fn import(&self, snapshot: &Snapshot) -> bool {
        let mut applied = false;

        if let Some(current) = &snapshot.current_json {
            applied |= self.store.set_str(CURRENT_JSON, current);
        }
        if let Some(history) = &snapshot.json_history {
            applied |= self.store.set_json(JSON_HISTORY, history);
        }
        if let Some(preferences) = &snapshot.preferences {
            for (key, value) in preferences {
                applied |= match value {
                    JsonValue::String(s) => self.store.set_str(key, s),
                    other => self.store.set_json(key, other),
                };
            }
        }
        if let Some(section_presets) = &snapshot.section_presets {
            applied |= self.store.set_json(SECTION_PRESETS, section_presets);
        }
        if let Some(presets) = &snapshot.presets {
            applied |= self.store.set_json(PRESETS, presets);
        }
        if let Some(custom_values) = &snapshot.custom_values {
            applied |= self.store.set_json(CUSTOM_VALUES, custom_values);
        }

        applied
    }

    /// Imports an untyped JSON value. A non-object is a no-op reported as
    /// `false`; an object goes through the lenient field-by-field parse.
    pub fn import_value(&self, value: &JsonValue) -> bool {
        if !value.is_object() {
            warn!("ignoring snapshot import of non-object value");
            return false;
        }
        match serde_json::from_value::<Snapshot>(value.clone()) {
            Ok(snapshot) => self.import(&snapshot),
            Err(e) => {
                warn!("ignoring unreadable snapshot: {e}");
                false
            }
        }
    }
}

/// Preference payloads are stored raw; values that parse as JSON travel as
/// their parsed shape, anything else as a plain string. [`SnapshotCodec::import`]
/// applies the inverse.
fn preference_to_value(raw: String) -> JsonValue {
    serde_json::from_str(&raw).unwrap_or(JsonValue::String(raw))
}
