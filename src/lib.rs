//! # PromptKeep Core
//!
//! Fail-safe local persistence, prompt history, and usage-milestone tracking
//! for the PromptKeep configuration dashboard. Built on redb for durable
//! embedded storage with a strict no-panic boundary: a broken storage
//! medium degrades to defaults and boolean results, never to a crash.
//!
//! ## Features
//!
//! - **Fail-safe key-value store**: reads fall back to caller defaults,
//!   writes report success as a boolean, all failures logged with the key
//! - **Portable snapshots**: export/import the whole persisted state as one
//!   forward-compatible JSON object, locally or over HTTP
//! - **Milestone counters**: monotonic usage counters whose thresholds fire
//!   exactly once, surviving session reloads
//! - **Capped logs**: FIFO-evicting prompt history (100 entries) and a
//!   rolling action log with a circuit-broken analytics dispatcher
//! - **Safe nested updates**: dotted-path option updates that reject
//!   prototype-polluting segments before touching anything
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use promptkeep_core::{KeyValueStore, PromptHistoryStore};
//!
//! let store = Arc::new(KeyValueStore::open("promptkeep.redb")?);
//! let mut history = PromptHistoryStore::new(store.clone());
//!
//! let entry = history.add(r#"{"style_preset":{"category":"photo"}}"#, Some("first draft"));
//! if let Some(entry) = entry {
//!     if let Some(outcome) = history.touch_copy(entry.id) {
//!         for milestone in outcome.fired {
//!             println!("copy milestone reached: {milestone}");
//!         }
//!     }
//! }
//! # Ok::<(), promptkeep_core::StoreError>(())
//! ```

pub mod action_log;
pub mod backend;
pub mod error;
pub mod history;
pub mod keys;
pub mod milestones;
pub mod nested;
pub mod presets;
pub mod snapshot;
pub mod store;
pub mod sync;

pub use action_log::{ActionEntry, ActionLog, AnalyticsSink, ACTION_LOG_CAP, MAX_DISPATCH_FAILURES};
pub use backend::{MemoryBackend, RedbBackend, StorageBackend};
pub use error::{PathError, SinkError, StoreError, SyncError};
pub use history::{DiffHighlighter, HistoryEntry, PromptHistoryStore, HIGHLIGHT_TTL, HISTORY_CAP};
pub use milestones::{CounterMilestoneTracker, MilestoneOutcome, DEFAULT_MILESTONES};
pub use nested::{apply_path, apply_path_default, DEFAULT_DENYLIST};
pub use presets::{Preset, PresetStore};
pub use snapshot::{Snapshot, SnapshotCodec};
pub use store::{KeyValueStore, SharedStore};
pub use sync::RemoteSync;
