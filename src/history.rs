//! Prompt history: a capped, FIFO-evicting collection of saved prompt
//! entries with per-entry edit/copy counters, plus the transient diff
//! highlight used when the current document changes.

use std::ops::Range;
use std::time::{Duration, Instant};

use chrono::Utc;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::keys::JSON_HISTORY;
use crate::milestones::{CounterMilestoneTracker, MilestoneOutcome, DEFAULT_MILESTONES};
use crate::store::SharedStore;

/// Maximum number of history entries kept. Insertion beyond the cap evicts
/// the oldest surviving entries first, favorites included.
pub const HISTORY_CAP: usize = 100;

/// How long an inserted-text highlight stays visible.
pub const HIGHLIGHT_TTL: Duration = Duration::from_secs(2);

/// Counter name bumped when a history entry's JSON is copied.
pub const COPY_COUNTER: &str = "copy";

/// Counter name bumped when a history entry is loaded back into the editor.
pub const EDIT_COUNTER: &str = "edit";

/// One saved prompt document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Creation-time monotonic token, also the deletion handle.
    pub id: u64,
    /// Creation timestamp, epoch milliseconds.
    pub date: i64,
    pub json: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default, rename = "editCount")]
    pub edit_count: u32,
    #[serde(default, rename = "copyCount")]
    pub copy_count: u32,
}

/// Capped prompt history persisted under the history key.
///
/// Copy/edit actions on entries also advance the corresponding named
/// counters through the milestone tracker, so the host can surface one-time
/// milestone celebrations.
pub struct PromptHistoryStore {
    store: SharedStore,
    tracker: CounterMilestoneTracker,
    last_id: u64,
}

impl PromptHistoryStore {
    pub fn new(store: SharedStore) -> Self {
        let tracker = CounterMilestoneTracker::new(store.clone());
        Self {
            store,
            tracker,
            last_id: 0,
        }
    }

    /// The milestone tracker shared with history actions, for counters the
    /// host raises directly (share, undo, redo).
    pub fn tracker(&self) -> &CounterMilestoneTracker {
        &self.tracker
    }

    /// Current entries, newest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.store.get_json(JSON_HISTORY, Vec::new())
    }

    fn persist(&self, entries: &[HistoryEntry]) -> bool {
        self.store.set_json(JSON_HISTORY, &entries)
    }

    /// Epoch-millisecond ids, bumped past the previous one so two commits in
    /// the same millisecond stay distinct.
    fn next_id(&mut self) -> u64 {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        self.last_id = now.max(self.last_id + 1);
        self.last_id
    }

    /// Commits a document into history. Returns the stored entry, or `None`
    /// when persistence failed and nothing was recorded.
    pub fn add(&mut self, json: &str, title: Option<&str>) -> Option<HistoryEntry> {
        let entry = HistoryEntry {
            id: self.next_id(),
            date: Utc::now().timestamp_millis(),
            json: json.to_string(),
            title: title.map(str::to_string),
            favorite: false,
            edit_count: 0,
            copy_count: 0,
        };
        let mut entries = self.entries();
        entries.insert(0, entry.clone());
        entries.truncate(HISTORY_CAP);
        if self.persist(&entries) {
            Some(entry)
        } else {
            None
        }
    }

    /// Imports raw items in bulk. Each usable item becomes a fresh entry
    /// (new id, current timestamp, counters zeroed, favorite off). Items
    /// that are neither a JSON string nor an object with a string `json`
    /// field are skipped. Returns how many imported entries survived the
    /// cap, or 0 when persistence failed.
    pub fn bulk_import(&mut self, items: &[JsonValue]) -> usize {
        let mut incoming = Vec::new();
        for item in items {
            let (json, title) = match item {
                JsonValue::String(s) => (s.clone(), None),
                JsonValue::Object(map) => match map.get("json").and_then(JsonValue::as_str) {
                    Some(s) => (
                        s.to_string(),
                        map.get("title")
                            .and_then(JsonValue::as_str)
                            .map(str::to_string),
                    ),
                    None => {
                        warn!("bulk import skipped item without a \"json\" field");
                        continue;
                    }
                },
                _ => {
                    warn!("bulk import skipped non-object item");
                    continue;
                }
            };
            incoming.push(HistoryEntry {
                id: self.next_id(),
                date: Utc::now().timestamp_millis(),
                json,
                title,
                favorite: false,
                edit_count: 0,
                copy_count: 0,
            });
        }
        if incoming.is_empty() {
            return 0;
        }
        let imported = incoming.len().min(HISTORY_CAP);
        let mut entries = self.entries();
        entries.splice(0..0, incoming);
        entries.truncate(HISTORY_CAP);
        if self.persist(&entries) {
            imported
        } else {
            0
        }
    }

    /// Removes one entry by id. Returns `false` when the id was absent or
    /// persistence failed.
    pub fn delete(&self, id: u64) -> bool {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return false;
        }
        self.persist(&entries)
    }

    /// Removes all entries.
    pub fn clear(&self) -> bool {
        self.persist(&[])
    }

    pub fn set_favorite(&self, id: u64, favorite: bool) -> bool {
        self.mutate(id, |entry| entry.favorite = favorite)
    }

    pub fn set_title(&self, id: u64, title: Option<&str>) -> bool {
        self.mutate(id, |entry| entry.title = title.map(str::to_string))
    }

    /// Bumps the copy counter on an entry and advances the `copy` usage
    /// counter, firing any newly crossed milestones exactly once.
    pub fn touch_copy(&self, id: u64) -> Option<MilestoneOutcome> {
        if !self.mutate(id, |entry| entry.copy_count += 1) {
            return None;
        }
        Some(self.tracker.increment(COPY_COUNTER, &DEFAULT_MILESTONES))
    }

    /// Bumps the edit counter on an entry and advances the `edit` usage
    /// counter, firing any newly crossed milestones exactly once.
    pub fn touch_edit(&self, id: u64) -> Option<MilestoneOutcome> {
        if !self.mutate(id, |entry| entry.edit_count += 1) {
            return None;
        }
        Some(self.tracker.increment(EDIT_COUNTER, &DEFAULT_MILESTONES))
    }

    fn mutate(&self, id: u64, apply: impl FnOnce(&mut HistoryEntry)) -> bool {
        let mut entries = self.entries();
        let Some(entry) = entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        apply(entry);
        self.persist(&entries)
    }
}

/// Tracks the character run inserted by the latest document change so the
/// host can render a transient highlight.
///
/// The previous-string reference is updated on every call, so each diff is
/// against the latest committed document, never a stale one. Runs expire
/// [`HIGHLIGHT_TTL`] after they were recorded. Ranges are in characters.
#[derive(Default)]
pub struct DiffHighlighter {
    previous: String,
    runs: Vec<(Range<usize>, Instant)>,
}

impl DiffHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the change to `next`, returning the inserted run if the
    /// change added text. Expired runs are dropped as a side effect.
    pub fn update(&mut self, next: &str, now: Instant) -> Option<Range<usize>> {
        let run = inserted_run(&self.previous, next);
        self.previous = next.to_string();
        self.runs
            .retain(|(_, at)| now.duration_since(*at) < HIGHLIGHT_TTL);
        if let Some(run) = run.clone() {
            self.runs.push((run, now));
        }
        run
    }

    /// Runs still within their highlight window at `now`.
    pub fn active(&self, now: Instant) -> Vec<Range<usize>> {
        self.runs
            .iter()
            .filter(|(_, at)| now.duration_since(*at) < HIGHLIGHT_TTL)
            .map(|(run, _)| run.clone())
            .collect()
    }
}

/// Character-level diff reduced to the single inserted run: trims the common
/// prefix and suffix and returns what `new` gained in between. `None` for
/// identical strings or pure deletions.
fn inserted_run(old: &str, new: &str) -> Option<Range<usize>> {
    if old == new {
        return None;
    }
    let old_chars: Vec<char> = old.chars().collect();
    let new_chars: Vec<char> = new.chars().collect();
    let max_common = old_chars.len().min(new_chars.len());

    let mut prefix = 0;
    while prefix < max_common && old_chars[prefix] == new_chars[prefix] {
        prefix += 1;
    }
    let mut suffix = 0;
    while suffix < max_common - prefix
        && old_chars[old_chars.len() - 1 - suffix] == new_chars[new_chars.len() - 1 - suffix]
    {
        suffix += 1;
    }

    if prefix + suffix >= new_chars.len() {
        return None;
    }
    Some(prefix..new_chars.len() - suffix)
}
