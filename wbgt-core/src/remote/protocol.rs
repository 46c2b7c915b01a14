//! Defines the JSON protocol used between the wbgt client and remote
//! provider binaries over stdin/stdout.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::record::{Record, Site};
use crate::remote::Document;

pub trait RemoteCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Ping,
    ListSites,
    ListDocuments,
    InsertDocument,
    UpdateDocument,
    QueryDocuments,
}

/// Request sent from the client to a provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent from a provider back to the client.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> String {
        serde_json::to_string(&Response::Success { data }).unwrap_or_else(|e| {
            Response::<()>::error(&format!("Failed to serialize response: {}", e))
        })
    }
}

impl Response<()> {
    pub fn error(msg: &str) -> String {
        let response = Response::<()>::Error {
            error: msg.to_string(),
        };
        serde_json::to_string(&response)
            .unwrap_or_else(|_| r#"{"status":"error","error":"unknown error"}"#.to_string())
    }
}

/// Provider-specific parameters from the `[remote]` config table.
pub type RemoteParams = serde_json::Map<String, serde_json::Value>;

/// Check that the remote answers at all.
#[derive(Debug, Serialize, Deserialize)]
pub struct Ping {
    #[serde(flatten)]
    pub remote_config: RemoteParams,
}

impl RemoteCommand for Ping {
    type Response = ();
    fn command() -> Command {
        Command::Ping
    }
}

/// List the construction sites.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListSites {
    #[serde(flatten)]
    pub remote_config: RemoteParams,
}

impl RemoteCommand for ListSites {
    type Response = Vec<Site>;
    fn command() -> Command {
        Command::ListSites
    }
}

/// List every measurement document.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListDocuments {
    #[serde(flatten)]
    pub remote_config: RemoteParams,
}

impl RemoteCommand for ListDocuments {
    type Response = Vec<Document>;
    fn command() -> Command {
        Command::ListDocuments
    }
}

/// Insert a record as a new document. Responds with the generated document id.
#[derive(Debug, Serialize, Deserialize)]
pub struct InsertDocument {
    #[serde(flatten)]
    pub remote_config: RemoteParams,
    pub record: Record,
}

impl RemoteCommand for InsertDocument {
    type Response = String;
    fn command() -> Command {
        Command::InsertDocument
    }
}

/// Overwrite the document with the given document id.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateDocument {
    #[serde(flatten)]
    pub remote_config: RemoteParams,
    pub document_id: String,
    pub record: Record,
}

impl RemoteCommand for UpdateDocument {
    type Response = ();
    fn command() -> Command {
        Command::UpdateDocument
    }
}

/// Find the documents whose record `id` field equals `record_id`.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryDocuments {
    #[serde(flatten)]
    pub remote_config: RemoteParams,
    pub record_id: String,
}

impl RemoteCommand for QueryDocuments {
    type Response = Vec<Document>;
    fn command() -> Command {
        Command::QueryDocuments
    }
}
