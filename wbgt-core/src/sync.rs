//! Offline-first sync engine.
//!
//! The engine reconciles the local cache with the remote store. The local
//! cache holds the full known record set under [`RECORDS_KEY`]; records that
//! have not reached the remote yet carry `sync_status = false` and are
//! flushed on the next online fetch.
//!
//! Every operation that touches the cache runs inside one serializing queue,
//! so overlapping calls read-modify-write the record set one at a time.

use std::collections::HashSet;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::connectivity::Connectivity;
use crate::constants::{RECORDS_KEY, SELECTED_SITE_KEY, SITES_KEY};
use crate::error::{WbgtError, WbgtResult};
use crate::local::LocalStore;
use crate::record::{Record, Site};
use crate::remote::RemoteStore;

/// Result of [`SyncEngine::fetch_or_cached`].
#[derive(Debug)]
pub struct FetchOutcome {
    pub records: Vec<Record>,
    /// Set when the remote could not be read and `records` is the cached set.
    pub load_error: Option<WbgtError>,
}

impl FetchOutcome {
    pub fn is_stale(&self) -> bool {
        self.load_error.is_some()
    }
}

pub struct SyncEngine<R, L> {
    remote: R,
    local: L,
    connectivity: Connectivity,
    write_queue: Mutex<()>,
}

impl<R: RemoteStore, L: LocalStore> SyncEngine<R, L> {
    pub fn new(remote: R, local: L, connectivity: Connectivity) -> Self {
        SyncEngine {
            remote,
            local,
            connectivity,
            write_queue: Mutex::new(()),
        }
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    // RECORDS:

    /// Load the full record set.
    ///
    /// Online, pending local records are pushed first, then the remote set
    /// replaces the cache. Offline, the cache is returned as is. A remote
    /// failure leaves the cache untouched and is returned to the caller.
    pub async fn fetch(&self) -> WbgtResult<Vec<Record>> {
        let online = self.is_online();
        let _guard = self.write_queue.lock().await;

        if !online {
            tracing::debug!("offline, serving records from local cache");
            return self.cached_records_unlocked().await;
        }

        let cached = self.cached_records_unlocked().await?;
        let pending = pending_unique(&cached);
        if !pending.is_empty() {
            tracing::info!(count = pending.len(), "flushing pending records");
            for record in pending {
                self.flush_pending(record).await?;
            }
        }

        let records: Vec<Record> = self
            .remote
            .list_documents()
            .await?
            .into_iter()
            .map(|document| document.record.with_sync_status(true))
            .collect();

        self.save_unlocked(RECORDS_KEY, &records).await?;
        tracing::debug!(count = records.len(), "local cache refreshed from remote");
        Ok(records)
    }

    /// Like [`fetch`](Self::fetch), but falls back to the unmodified cache
    /// when the remote cannot be read.
    pub async fn fetch_or_cached(&self) -> WbgtResult<FetchOutcome> {
        match self.fetch().await {
            Ok(records) => Ok(FetchOutcome {
                records,
                load_error: None,
            }),
            Err(e) if e.is_remote() => {
                tracing::warn!(error = %e, "remote load failed, using cached records");
                Ok(FetchOutcome {
                    records: self.cached_records().await?,
                    load_error: Some(e),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Append a record.
    ///
    /// Online, the remote write happens first and a failure leaves the cache
    /// untouched. Offline, the record is stored as pending. Returns the
    /// updated full set. No duplicate check happens here.
    pub async fn add_record(&self, record: Record) -> WbgtResult<Vec<Record>> {
        let online = self.is_online();
        let _guard = self.write_queue.lock().await;

        let mut records = self.cached_records_unlocked().await?;

        let record = if online {
            let record = record.with_sync_status(true);
            let document_id = self.remote.insert_document(&record).await?;
            tracing::info!(record_id = %record.id, %document_id, "record written to remote");
            record
        } else {
            tracing::info!(record_id = %record.id, "offline, record stored as pending");
            record.with_sync_status(false)
        };

        records.push(record);
        self.save_unlocked(RECORDS_KEY, &records).await?;
        Ok(records)
    }

    /// Replace the record with the same id.
    ///
    /// An id that is not in the local set is a no-op. Online, every remote
    /// document holding that id is overwritten; if none exists the record
    /// stays pending. The stored creation time is kept.
    pub async fn update_record(&self, record: Record) -> WbgtResult<Vec<Record>> {
        let online = self.is_online();
        let _guard = self.write_queue.lock().await;

        let mut records = self.cached_records_unlocked().await?;

        let Some(index) = records.iter().position(|r| r.id == record.id) else {
            tracing::debug!(record_id = %record.id, "update for unknown record ignored");
            return Ok(records);
        };

        let mut record = record;
        record.creation_time = records[index].creation_time.clone();

        let record = if online {
            let synced = record.with_sync_status(true);
            let documents = self.remote.query_by_record_id(&synced.id).await?;
            for document in &documents {
                self.remote.update_document(&document.id, &synced).await?;
            }
            if documents.is_empty() {
                tracing::debug!(record_id = %synced.id, "no remote document yet, record stays pending");
                synced.with_sync_status(false)
            } else {
                synced
            }
        } else {
            record.with_sync_status(false)
        };

        records[index] = record;
        self.save_unlocked(RECORDS_KEY, &records).await?;
        Ok(records)
    }

    /// Current cache contents, without contacting the remote.
    pub async fn cached_records(&self) -> WbgtResult<Vec<Record>> {
        let _guard = self.write_queue.lock().await;
        self.cached_records_unlocked().await
    }

    /// Records that exist only locally.
    pub async fn pending_records(&self) -> WbgtResult<Vec<Record>> {
        Ok(self
            .cached_records()
            .await?
            .into_iter()
            .filter(Record::is_pending)
            .collect())
    }

    // SITES:

    /// Site list. Online it is refreshed from the remote first.
    pub async fn fetch_sites(&self) -> WbgtResult<Vec<Site>> {
        let online = self.is_online();
        let _guard = self.write_queue.lock().await;

        if online {
            let sites = self.remote.list_sites().await?;
            self.save_unlocked(SITES_KEY, &sites).await?;
        }

        Ok(self.load(SITES_KEY).await?.unwrap_or_default())
    }

    /// Remember the site picked in the add form.
    pub async fn remember_site(&self, site: &Site) -> WbgtResult<()> {
        let _guard = self.write_queue.lock().await;
        self.save_unlocked(SELECTED_SITE_KEY, site).await
    }

    pub async fn last_site(&self) -> WbgtResult<Option<Site>> {
        self.load(SELECTED_SITE_KEY).await
    }

    // INTERNAL:

    /// Push one pending record, updating an existing remote copy instead of
    /// inserting a second one.
    async fn flush_pending(&self, record: &Record) -> WbgtResult<()> {
        let synced = record.clone().with_sync_status(true);
        let existing = self.remote.query_by_record_id(&synced.id).await?;

        if existing.is_empty() {
            self.remote.insert_document(&synced).await?;
        } else {
            for document in &existing {
                self.remote.update_document(&document.id, &synced).await?;
            }
        }
        tracing::debug!(record_id = %synced.id, "pending record flushed");
        Ok(())
    }

    async fn cached_records_unlocked(&self) -> WbgtResult<Vec<Record>> {
        Ok(self.load(RECORDS_KEY).await?.unwrap_or_default())
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> WbgtResult<Option<T>> {
        match self.local.get(key).await? {
            Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
                WbgtError::Serialization(format!("Cached '{}' is unreadable: {}", key, e))
            }),
            None => Ok(None),
        }
    }

    async fn save_unlocked<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> WbgtResult<()> {
        self.local.set(key, serde_json::to_value(value)?).await
    }
}

/// Pending records, once per id. A later entry with the same id wins.
fn pending_unique(records: &[Record]) -> Vec<&Record> {
    let mut seen = HashSet::new();
    let mut pending: Vec<&Record> = records
        .iter()
        .rev()
        .filter(|r| r.is_pending())
        .filter(|r| seen.insert(r.id.as_str()))
        .collect();
    pending.reverse();
    pending
}
