//! Section-scoped option presets and user-supplied custom value lists.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::keys::{CUSTOM_VALUES, SECTION_PRESETS};
use crate::store::SharedStore;

/// A named bundle of option values, unique by name within its section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub values: Map<String, JsonValue>,
}

pub type SectionPresets = BTreeMap<String, Vec<Preset>>;
pub type CustomValues = BTreeMap<String, Vec<String>>;

/// Preset and custom-value persistence over the key-value store.
pub struct PresetStore {
    store: SharedStore,
}

impl PresetStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    fn all(&self) -> SectionPresets {
        self.store.get_json(SECTION_PRESETS, SectionPresets::new())
    }

    /// Presets saved under a section, in insertion order.
    pub fn list(&self, section: &str) -> Vec<Preset> {
        self.all().remove(section).unwrap_or_default()
    }

    /// Saves a preset into a section, replacing any preset with the same
    /// name.
    pub fn save(&self, section: &str, preset: Preset) -> bool {
        let mut all = self.all();
        let presets = all.entry(section.to_string()).or_default();
        presets.retain(|p| p.name != preset.name);
        presets.push(preset);
        self.store.set_json(SECTION_PRESETS, &all)
    }

    /// Renames a preset by delete-then-insert. A preset already holding the
    /// new name is overwritten. Returns `false` when `old` was absent or
    /// persistence failed.
    pub fn rename(&self, section: &str, old: &str, new: &str) -> bool {
        let mut all = self.all();
        let Some(presets) = all.get_mut(section) else {
            return false;
        };
        let Some(index) = presets.iter().position(|p| p.name == old) else {
            return false;
        };
        let mut preset = presets.remove(index);
        preset.name = new.to_string();
        presets.retain(|p| p.name != new);
        presets.push(preset);
        self.store.set_json(SECTION_PRESETS, &all)
    }

    /// Deletes a preset. Returns `false` when it was absent or persistence
    /// failed.
    pub fn delete(&self, section: &str, name: &str) -> bool {
        let mut all = self.all();
        let Some(presets) = all.get_mut(section) else {
            return false;
        };
        let before = presets.len();
        presets.retain(|p| p.name != name);
        if presets.len() == before {
            return false;
        }
        if presets.is_empty() {
            all.remove(section);
        }
        self.store.set_json(SECTION_PRESETS, &all)
    }

    /// Custom values recorded for a field.
    pub fn custom_values(&self, field: &str) -> Vec<String> {
        self.store
            .get_json(CUSTOM_VALUES, CustomValues::new())
            .remove(field)
            .unwrap_or_default()
    }

    /// Appends a custom value to a field's list, ignoring duplicates.
    pub fn add_custom_value(&self, field: &str, value: &str) -> bool {
        let mut all: CustomValues = self.store.get_json(CUSTOM_VALUES, CustomValues::new());
        let values = all.entry(field.to_string()).or_default();
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
        self.store.set_json(CUSTOM_VALUES, &all)
    }
}
