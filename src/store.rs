//! Fail-safe key-value layer.
//!
//! Every read degrades to a caller-supplied default and every write reports
//! success as a boolean. Nothing at or above this boundary throws because of
//! a broken storage medium; failures are logged at warning level with the
//! offending key so a host can diagnose them without crashing.

use std::path::Path;
use std::sync::Arc;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::{MemoryBackend, RedbBackend, StorageBackend};
use crate::error::StoreError;

/// Fail-safe wrapper over a [`StorageBackend`].
///
/// Reads never fail: an absent key, a backend error, or a corrupted payload
/// all degrade to the default the caller supplied. Writes either fully
/// succeed (`true`) or leave existing state untouched (`false`).
pub struct KeyValueStore {
    backend: Box<dyn StorageBackend>,
}

impl KeyValueStore {
    /// Opens a persistent store backed by a redb database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self {
            backend: Box::new(RedbBackend::open(path)?),
        })
    }

    /// An ephemeral in-memory store.
    pub fn in_memory() -> Self {
        Self {
            backend: Box::new(MemoryBackend::new()),
        }
    }

    pub fn with_backend(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Raw read. `None` when the key is absent or the backend failed.
    pub fn get_opt(&self, key: &str) -> Option<String> {
        match self.backend.load(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("read failed for key \"{key}\": {e}");
                None
            }
        }
    }

    /// Plain-string read with a default.
    pub fn get_str(&self, key: &str, default: &str) -> String {
        self.get_opt(key).unwrap_or_else(|| default.to_string())
    }

    /// JSON read with a default. A malformed payload degrades to the default
    /// rather than propagating a parse error.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(raw) = self.get_opt(key) else {
            return default;
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("malformed payload for key \"{key}\": {e}");
                default
            }
        }
    }

    /// Plain-string write. Returns `false` if the backend rejected the write.
    pub fn set_str(&self, key: &str, value: &str) -> bool {
        match self.backend.store(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!("write failed for key \"{key}\": {e}");
                false
            }
        }
    }

    /// Serializes `value` to JSON and writes it. Returns `false` on either a
    /// serialization or a backend failure.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("serialization failed for key \"{key}\": {e}");
                return false;
            }
        };
        self.set_str(key, &raw)
    }

    /// Removes a key. Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> bool {
        match self.backend.delete(key) {
            Ok(()) => true,
            Err(e) => {
                warn!("remove failed for key \"{key}\": {e}");
                false
            }
        }
    }

    /// Best-effort removal of a key list. Individual failures are logged by
    /// [`remove`](Self::remove) and do not stop the sweep.
    pub fn purge(&self, keys: &[&str]) {
        for key in keys {
            self.remove(key);
        }
    }
}

/// Shared handle used by the components that sit on top of the store.
pub type SharedStore = Arc<KeyValueStore>;
