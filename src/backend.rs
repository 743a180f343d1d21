//! Storage backends for the key-value layer.
//!
//! [`StorageBackend`] abstracts over the persistent medium so the fail-safe
//! [`KeyValueStore`](crate::store::KeyValueStore) can run against an embedded
//! redb database in production or a plain in-memory map in tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use redb::{Database, ReadableTable, TableDefinition};

use crate::error::StoreError;

const RECORDS: TableDefinition<&str, &str> = TableDefinition::new("records");

/// A synchronous, string-keyed storage medium.
///
/// Implementations may fail on any operation (quota, disabled storage,
/// corruption); errors are surfaced as [`StoreError`] and handled by the
/// layer above. A `store` either fully persists the value or leaves the
/// previous value intact.
pub trait StorageBackend: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn store(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: StorageBackend> StorageBackend for std::sync::Arc<T> {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).load(key)
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).store(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}

/// Embedded redb-backed storage. One table, one committed write transaction
/// per mutation, so a failed write never leaves a partial value behind.
pub struct RedbBackend {
    db: Database,
}

impl RedbBackend {
    /// Creates or opens the database file at `path` and ensures the records
    /// table exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = Database::create(path)?;
        let txn = db.begin_write()?;
        txn.open_table(RECORDS)?;
        txn.commit()?;
        Ok(Self { db })
    }
}

impl StorageBackend for RedbBackend {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(RECORDS)?;
        Ok(table.get(key)?.map(|guard| guard.value().to_string()))
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(RECORDS)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(RECORDS)?;
            table.remove(key)?;
        }
        txn.commit()?;
        Ok(())
    }
}

/// In-memory storage. Used in tests and for hosts that run without a
/// writable filesystem.
///
/// The failure switch makes every subsequent operation return an error,
/// simulating disabled or quota-exhausted storage.
#[derive(Default)]
pub struct MemoryBackend {
    map: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles simulated storage failure.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::DatabaseError("storage unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_available()?;
        let map = self
            .map
            .lock()
            .map_err(|e| StoreError::DatabaseError(format!("lock poisoned: {}", e)))?;
        Ok(map.get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_available()?;
        let mut map = self
            .map
            .lock()
            .map_err(|e| StoreError::DatabaseError(format!("lock poisoned: {}", e)))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.check_available()?;
        let mut map = self
            .map
            .lock()
            .map_err(|e| StoreError::DatabaseError(format!("lock poisoned: {}", e)))?;
        map.remove(key);
        Ok(())
    }
}
