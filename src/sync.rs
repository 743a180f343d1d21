//! Remote snapshot synchronization.
//!
//! One-shot push/pull of the full [`Snapshot`](crate::snapshot::Snapshot)
//! over plain HTTP(S). Every transport-level failure is normalized into a
//! single [`SyncError`] per direction; retry, backoff, and timeouts belong
//! to the caller.

use log::{info, warn};

use crate::error::SyncError;
use crate::snapshot::{Snapshot, SnapshotCodec};
use crate::store::SharedStore;

pub struct RemoteSync {
    codec: SnapshotCodec,
    client: reqwest::Client,
}

impl RemoteSync {
    pub fn new(store: SharedStore) -> Self {
        Self {
            codec: SnapshotCodec::new(store),
            client: reqwest::Client::new(),
        }
    }

    /// Serializes the current state and POSTs it as a JSON body to `url`.
    pub async fn push(&self, url: &str) -> Result<(), SyncError> {
        let snapshot = self.codec.export();
        let response = self
            .client
            .post(url)
            .json(&snapshot)
            .send()
            .await
            .map_err(|e| {
                warn!("snapshot push to {url} failed: {e}");
                SyncError::Push
            })?;
        if !response.status().is_success() {
            warn!("snapshot push to {url} rejected: {}", response.status());
            return Err(SyncError::Push);
        }
        info!("snapshot pushed to {url}");
        Ok(())
    }

    /// Fetches a snapshot from `url` and imports it. No local state is
    /// written unless fetch and parse both succeeded.
    pub async fn pull(&self, url: &str) -> Result<(), SyncError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("snapshot pull from {url} failed: {e}");
            SyncError::Pull
        })?;
        if !response.status().is_success() {
            warn!("snapshot pull from {url} rejected: {}", response.status());
            return Err(SyncError::Pull);
        }
        let snapshot: Snapshot = response.json().await.map_err(|e| {
            warn!("snapshot pull from {url} returned an unreadable body: {e}");
            SyncError::Pull
        })?;
        self.codec.import(&snapshot);
        info!("snapshot pulled from {url}");
        Ok(())
    }
}
