//! In-process remote store.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{WbgtError, WbgtResult};
use crate::record::{Record, Site};
use crate::remote::{Document, RemoteStore};

/// Which calls a `MemoryRemote` should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Failure {
    #[default]
    None,
    /// Every call fails, as if the network were down.
    All,
    /// Only `list_documents` fails; writes still go through.
    ListDocuments,
}

#[derive(Default)]
struct State {
    documents: Vec<Document>,
    sites: Vec<Site>,
    failure: Failure,
    next_id: u64,
}

/// Remote store held in memory, with switchable failures.
#[derive(Default)]
pub struct MemoryRemote {
    state: Mutex<State>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sites(sites: Vec<Site>) -> Self {
        MemoryRemote {
            state: Mutex::new(State {
                sites,
                ..State::default()
            }),
        }
    }

    pub async fn set_failure(&self, failure: Failure) {
        self.state.lock().await.failure = failure;
    }

    /// Snapshot of the records currently stored, in insertion order.
    pub async fn records(&self) -> Vec<Record> {
        let state = self.state.lock().await;
        state.documents.iter().map(|d| d.record.clone()).collect()
    }

    fn check(state: &State, op: Failure) -> WbgtResult<()> {
        if state.failure == Failure::All || (op != Failure::None && state.failure == op) {
            return Err(WbgtError::Remote("remote store unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn ping(&self) -> WbgtResult<()> {
        let state = self.state.lock().await;
        Self::check(&state, Failure::None)
    }

    async fn list_sites(&self) -> WbgtResult<Vec<Site>> {
        let state = self.state.lock().await;
        Self::check(&state, Failure::None)?;
        Ok(state.sites.clone())
    }

    async fn list_documents(&self) -> WbgtResult<Vec<Document>> {
        let state = self.state.lock().await;
        Self::check(&state, Failure::ListDocuments)?;
        Ok(state.documents.clone())
    }

    async fn insert_document(&self, record: &Record) -> WbgtResult<String> {
        let mut state = self.state.lock().await;
        Self::check(&state, Failure::None)?;

        state.next_id += 1;
        let id = format!("doc-{}", state.next_id);
        state.documents.push(Document {
            id: id.clone(),
            record: record.clone(),
        });
        Ok(id)
    }

    async fn update_document(&self, document_id: &str, record: &Record) -> WbgtResult<()> {
        let mut state = self.state.lock().await;
        Self::check(&state, Failure::None)?;

        let document = state
            .documents
            .iter_mut()
            .find(|d| d.id == document_id)
            .ok_or_else(|| WbgtError::Remote(format!("No document '{}'", document_id)))?;
        document.record = record.clone();
        Ok(())
    }

    async fn query_by_record_id(&self, record_id: &str) -> WbgtResult<Vec<Document>> {
        let state = self.state.lock().await;
        Self::check(&state, Failure::None)?;

        Ok(state
            .documents
            .iter()
            .filter(|d| d.record.id == record_id)
            .cloned()
            .collect())
    }
}
