//! wbgt-remote-file - JSON file remote store provider for the wbgt CLI
//!
//! This binary implements the wbgt provider protocol, communicating with
//! the client via JSON over stdin/stdout. Documents and sites live in a
//! single JSON file given by the `path` parameter of the `[remote]` table.

mod store;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use wbgt_core::record::Record;
use wbgt_core::remote::protocol::{Command, Request, Response};

use crate::store::DocumentFile;

fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(error = %e, "failed to read stdin");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle_request(request),
            Err(e) => Response::<()>::error(&format!("Failed to parse request: {}", e)),
        };

        writeln!(stdout, "{}", response)?;
        stdout.flush()?;
    }

    Ok(())
}

#[derive(Debug, Deserialize)]
struct StoreParams {
    path: String,
}

#[derive(Debug, Deserialize)]
struct InsertParams {
    path: String,
    record: Record,
}

#[derive(Debug, Deserialize)]
struct UpdateParams {
    path: String,
    document_id: String,
    record: Record,
}

#[derive(Debug, Deserialize)]
struct QueryParams {
    path: String,
    record_id: String,
}

fn parse<P: serde::de::DeserializeOwned>(params: serde_json::Value) -> Result<P, String> {
    serde_json::from_value(params).map_err(|e| Response::<()>::error(&format!("Invalid params: {}", e)))
}

fn handle_request(request: Request) -> String {
    tracing::debug!(command = ?request.command, "handling request");
    let result = match request.command {
        Command::Ping => handle_ping(request.params),
        Command::ListSites => handle_list_sites(request.params),
        Command::ListDocuments => handle_list_documents(request.params),
        Command::InsertDocument => handle_insert_document(request.params),
        Command::UpdateDocument => handle_update_document(request.params),
        Command::QueryDocuments => handle_query_documents(request.params),
    };
    result.unwrap_or_else(|error_response| error_response)
}

fn handle_ping(params: serde_json::Value) -> Result<String, String> {
    let params: StoreParams = parse(params)?;
    match DocumentFile::open(&params.path).load() {
        Ok(_) => Ok(Response::success(())),
        Err(e) => Err(Response::<()>::error(&format!("{:#}", e))),
    }
}

fn handle_list_sites(params: serde_json::Value) -> Result<String, String> {
    let params: StoreParams = parse(params)?;
    match DocumentFile::open(&params.path).load() {
        Ok(contents) => Ok(Response::success(contents.sites)),
        Err(e) => Err(Response::<()>::error(&format!("{:#}", e))),
    }
}

fn handle_list_documents(params: serde_json::Value) -> Result<String, String> {
    let params: StoreParams = parse(params)?;
    match DocumentFile::open(&params.path).load() {
        Ok(contents) => Ok(Response::success(contents.documents)),
        Err(e) => Err(Response::<()>::error(&format!("{:#}", e))),
    }
}

fn handle_insert_document(params: serde_json::Value) -> Result<String, String> {
    let params: InsertParams = parse(params)?;
    match DocumentFile::open(&params.path).insert(params.record) {
        Ok(document_id) => Ok(Response::success(document_id)),
        Err(e) => Err(Response::<()>::error(&format!("{:#}", e))),
    }
}

fn handle_update_document(params: serde_json::Value) -> Result<String, String> {
    let params: UpdateParams = parse(params)?;
    match DocumentFile::open(&params.path).update(&params.document_id, params.record) {
        Ok(()) => Ok(Response::success(())),
        Err(e) => Err(Response::<()>::error(&format!("{:#}", e))),
    }
}

fn handle_query_documents(params: serde_json::Value) -> Result<String, String> {
    let params: QueryParams = parse(params)?;
    match DocumentFile::open(&params.path).query_by_record_id(&params.record_id) {
        Ok(documents) => Ok(Response::success(documents)),
        Err(e) => Err(Response::<()>::error(&format!("{:#}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wbgt_core::record::Site;
    use wbgt_core::remote::Document;
    use wbgt_core::remote::protocol::{
        InsertDocument, ListDocuments, ListSites, Ping, QueryDocuments, RemoteCommand,
        RemoteParams, UpdateDocument,
    };
    use wbgt_core::slot::TimeSlot;

    fn params(path: &std::path::Path) -> RemoteParams {
        let mut params = RemoteParams::new();
        params.insert("path".into(), serde_json::json!(path.display().to_string()));
        params
    }

    fn record(id: &str, wbgt: f64) -> Record {
        let mut record = Record::new(
            Site::new("s1", "A工事"),
            NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(),
            TimeSlot::Morning,
            31.0,
            65.0,
            wbgt,
        );
        record.id = id.to_string();
        record.with_sync_status(true)
    }

    /// Send `cmd` through the request dispatcher the way the client does.
    fn send<C: RemoteCommand>(cmd: C) -> Response<C::Response> {
        let request = Request {
            command: C::command(),
            params: serde_json::to_value(cmd).unwrap(),
        };
        let line = serde_json::to_string(&request).unwrap();
        let request: Request = serde_json::from_str(&line).unwrap();
        serde_json::from_str(&handle_request(request)).unwrap()
    }

    fn data<T>(response: Response<T>) -> T {
        match response {
            Response::Success { data } => data,
            Response::Error { error } => panic!("provider error: {}", error),
        }
    }

    #[test]
    fn test_ping_on_missing_file_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remote.json");

        data(send(Ping {
            remote_config: params(&path),
        }));
    }

    #[test]
    fn test_insert_then_query_by_record_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remote.json");

        let document_id = data(send(InsertDocument {
            remote_config: params(&path),
            record: record("r1", 29.5),
        }));
        data(send(InsertDocument {
            remote_config: params(&path),
            record: record("r2", 31.0),
        }));

        let found: Vec<Document> = data(send(QueryDocuments {
            remote_config: params(&path),
            record_id: "r1".into(),
        }));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, document_id);
        assert_eq!(found[0].record.wbgt, 29.5);

        let all = data(send(ListDocuments {
            remote_config: params(&path),
        }));
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_update_document_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remote.json");

        let document_id = data(send(InsertDocument {
            remote_config: params(&path),
            record: record("r1", 29.5),
        }));
        data(send(UpdateDocument {
            remote_config: params(&path),
            document_id: document_id.clone(),
            record: record("r1", 33.0),
        }));

        let all = data(send(ListDocuments {
            remote_config: params(&path),
        }));
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, document_id);
        assert_eq!(all[0].record.wbgt, 33.0);
    }

    #[test]
    fn test_update_unknown_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remote.json");

        let response = send(UpdateDocument {
            remote_config: params(&path),
            document_id: "missing".into(),
            record: record("r1", 29.5),
        });
        assert!(matches!(response, Response::Error { error } if error.contains("missing")));
    }

    #[test]
    fn test_missing_path_param_is_an_error() {
        let response = send(Ping {
            remote_config: RemoteParams::new(),
        });
        assert!(matches!(response, Response::Error { error } if error.contains("Invalid params")));
    }

    #[test]
    fn test_sites_come_from_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remote.json");
        std::fs::write(
            &path,
            r#"{ "sites": [{ "id": "s1", "label": "A工事" }], "documents": [] }"#,
        )
        .unwrap();

        let sites = data(send(ListSites {
            remote_config: params(&path),
        }));
        assert_eq!(sites, vec![Site::new("s1", "A工事")]);
    }
}
