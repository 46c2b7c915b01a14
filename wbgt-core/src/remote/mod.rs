//! The remote document store: source of truth whenever it is reachable.

mod memory;
pub mod protocol;
pub mod provider;

pub use memory::{Failure, MemoryRemote};
pub use provider::{Provider, ProviderRemote};

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{WbgtError, WbgtResult};
use crate::record::{Record, Site};

/// A stored document: the store's own key plus the record it holds.
///
/// The document id is assigned by the store and is unrelated to `record.id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub record: Record,
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Cheap reachability check.
    async fn ping(&self) -> WbgtResult<()>;

    async fn list_sites(&self) -> WbgtResult<Vec<Site>>;

    async fn list_documents(&self) -> WbgtResult<Vec<Document>>;

    /// Insert a new document, returning its generated document id.
    async fn insert_document(&self, record: &Record) -> WbgtResult<String>;

    async fn update_document(&self, document_id: &str, record: &Record) -> WbgtResult<()>;

    /// Documents whose record `id` field equals `record_id`.
    async fn query_by_record_id(&self, record_id: &str) -> WbgtResult<Vec<Document>>;
}

/// A missing remote: every call fails with `NoRemoteConfigured`.
#[async_trait]
impl<R: RemoteStore> RemoteStore for Option<R> {
    async fn ping(&self) -> WbgtResult<()> {
        configured(self)?.ping().await
    }

    async fn list_sites(&self) -> WbgtResult<Vec<Site>> {
        configured(self)?.list_sites().await
    }

    async fn list_documents(&self) -> WbgtResult<Vec<Document>> {
        configured(self)?.list_documents().await
    }

    async fn insert_document(&self, record: &Record) -> WbgtResult<String> {
        configured(self)?.insert_document(record).await
    }

    async fn update_document(&self, document_id: &str, record: &Record) -> WbgtResult<()> {
        configured(self)?.update_document(document_id, record).await
    }

    async fn query_by_record_id(&self, record_id: &str) -> WbgtResult<Vec<Document>> {
        configured(self)?.query_by_record_id(record_id).await
    }
}

fn configured<R>(remote: &Option<R>) -> WbgtResult<&R> {
    remote.as_ref().ok_or(WbgtError::NoRemoteConfigured)
}

/// The `[remote]` table of the config file.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RemoteConfig {
    pub provider: String,
    #[serde(flatten)]
    pub params: HashMap<String, toml::Value>,
}

impl From<&RemoteConfig> for protocol::RemoteParams {
    fn from(config: &RemoteConfig) -> Self {
        config
            .params
            .iter()
            .filter_map(|(k, v)| serde_json::to_value(v).ok().map(|v| (k.clone(), v)))
            .collect()
    }
}
