use std::fmt::{Display, Formatter};

use redb::{
    CommitError, DatabaseError, Error as RedbError, StorageError, TableError, TransactionError,
};
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;

/// Errors raised below the fail-safe [`KeyValueStore`](crate::store::KeyValueStore)
/// boundary. Callers above that boundary never see these; the store converts
/// them into default values and boolean results.
#[derive(Debug, Serialize, Deserialize)]
pub enum StoreError {
    DatabaseError(String),
    SerializationError(String),
    NotFound(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            StoreError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            StoreError::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<RedbError> for StoreError {
    fn from(err: RedbError) -> Self {
        match err {
            RedbError::TableDoesNotExist(name) => {
                StoreError::NotFound(format!("Table '{}' not found", name))
            }
            RedbError::Corrupted(msg) => {
                StoreError::DatabaseError(format!("Database is corrupted: {}", msg))
            }
            RedbError::Io(io_err) => StoreError::DatabaseError(format!("IO error: {}", io_err)),
            _ => StoreError::DatabaseError(format!("Database error: {:?}", err)),
        }
    }
}

impl From<SerdeError> for StoreError {
    fn from(err: SerdeError) -> Self {
        StoreError::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        StoreError::DatabaseError(format!("Database open error: {:?}", err))
    }
}

impl From<TransactionError> for StoreError {
    fn from(err: TransactionError) -> Self {
        StoreError::DatabaseError(format!("Transaction error: {:?}", err))
    }
}

impl From<TableError> for StoreError {
    fn from(err: TableError) -> Self {
        StoreError::DatabaseError(format!("Table operation error: {:?}", err))
    }
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        StoreError::DatabaseError(format!("Storage error: {:?}", err))
    }
}

impl From<CommitError> for StoreError {
    fn from(err: CommitError) -> Self {
        StoreError::DatabaseError(format!("Commit error: {:?}", err))
    }
}

/// Failure signals for [`RemoteSync`](crate::sync::RemoteSync). Transport
/// details are normalized away; the caller only needs to know which
/// direction failed.
#[derive(Debug, PartialEq, Eq)]
pub enum SyncError {
    /// Pushing the snapshot to the remote endpoint failed.
    Push,
    /// Fetching or parsing the remote snapshot failed.
    Pull,
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Push => write!(f, "failed to sync config"),
            SyncError::Pull => write!(f, "failed to load config"),
        }
    }
}

impl std::error::Error for SyncError {}

/// Error reported by an external analytics sink.
#[derive(Debug)]
pub struct SinkError(pub String);

impl Display for SinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "analytics sink error: {}", self.0)
    }
}

impl std::error::Error for SinkError {}

/// Rejection reasons for [`apply_path`](crate::nested::apply_path).
#[derive(Debug, PartialEq, Eq)]
pub enum PathError {
    /// The path was empty or contained an empty segment.
    EmptyPath,
    /// A segment matched the unsafe-segment denylist.
    BlockedSegment(String),
}

impl Display for PathError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::EmptyPath => write!(f, "empty path or path segment"),
            PathError::BlockedSegment(seg) => write!(f, "blocked unsafe path segment '{}'", seg),
        }
    }
}

impl std::error::Error for PathError {}
