//! Provider subprocess transport.
//!
//! A provider is any executable named `wbgt-remote-<name>` on PATH that
//! reads one JSON request line from stdin and answers with one JSON
//! response line on stdout. Providers own their credentials; the client
//! only forwards the parameters from the `[remote]` config table.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use crate::error::{WbgtError, WbgtResult};
use crate::record::{Record, Site};
use crate::remote::protocol::{
    Command, InsertDocument, ListDocuments, ListSites, Ping, QueryDocuments, RemoteCommand,
    RemoteParams, Request, Response, UpdateDocument,
};
use crate::remote::{Document, RemoteConfig, RemoteStore};

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct Provider {
    name: String,
    binary: Option<PathBuf>,
    timeout: Duration,
}

impl Provider {
    pub fn from_name(name: &str) -> Self {
        Provider {
            name: name.to_string(),
            binary: None,
            timeout: PROVIDER_TIMEOUT,
        }
    }

    /// Use `binary` instead of looking the provider up on PATH.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = Some(binary.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binary_name(&self) -> String {
        format!("wbgt-remote-{}", self.name)
    }

    fn binary_path(&self) -> WbgtResult<PathBuf> {
        if let Some(binary) = &self.binary {
            return Ok(binary.clone());
        }
        let binary_name = self.binary_name();
        which::which(&binary_name).map_err(|_| {
            WbgtError::ProviderNotInstalled(format!(
                "{} (install it with: cargo install {})",
                self.name, binary_name
            ))
        })
    }

    /// Call a typed provider command and return the result.
    ///
    /// A provider still running when the timeout fires is killed.
    pub async fn call<C: RemoteCommand>(&self, cmd: C) -> WbgtResult<C::Response> {
        timeout(self.timeout, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| WbgtError::ProviderTimeout(self.timeout.as_secs()))?
    }

    async fn call_raw<P: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> WbgtResult<R> {
        let params = serde_json::to_value(params)?;
        let request = Request { command, params };
        let request_json = serde_json::to_string(&request)?;

        let binary_path = self.binary_path()?;
        tracing::debug!(provider = %self.name, ?command, "calling remote provider");

        let mut child = TokioCommand::new(&binary_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                WbgtError::Remote(format!("Failed to spawn {}: {}", binary_path.display(), e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| WbgtError::Remote("Provider stdin unavailable".into()))?;
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await
            .map_err(|e| WbgtError::Remote(format!("Failed to write to provider: {}", e)))?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| WbgtError::Remote(format!("Failed to read from provider: {}", e)))?;

        if !output.status.success() {
            return Err(WbgtError::Remote(format!(
                "Provider exited with status: {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        let response_str = String::from_utf8_lossy(&output.stdout);
        if response_str.trim().is_empty() {
            return Err(WbgtError::Remote("Provider returned no response".into()));
        }

        let response: Response<R> = serde_json::from_str(&response_str)
            .map_err(|e| WbgtError::Remote(format!("Failed to parse response: {}", e)))?;

        match response {
            Response::Success { data } => Ok(data),
            Response::Error { error } => Err(WbgtError::Remote(error)),
        }
    }
}

/// Remote store reached through a provider binary.
#[derive(Debug, Clone)]
pub struct ProviderRemote {
    provider: Provider,
    params: RemoteParams,
}

impl ProviderRemote {
    pub fn new(config: &RemoteConfig) -> Self {
        Self::with_provider(Provider::from_name(&config.provider), RemoteParams::from(config))
    }

    pub fn with_provider(provider: Provider, params: RemoteParams) -> Self {
        ProviderRemote { provider, params }
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }
}

#[async_trait]
impl RemoteStore for ProviderRemote {
    async fn ping(&self) -> WbgtResult<()> {
        self.provider
            .call(Ping {
                remote_config: self.params.clone(),
            })
            .await
    }

    async fn list_sites(&self) -> WbgtResult<Vec<Site>> {
        self.provider
            .call(ListSites {
                remote_config: self.params.clone(),
            })
            .await
    }

    async fn list_documents(&self) -> WbgtResult<Vec<Document>> {
        self.provider
            .call(ListDocuments {
                remote_config: self.params.clone(),
            })
            .await
    }

    async fn insert_document(&self, record: &Record) -> WbgtResult<String> {
        self.provider
            .call(InsertDocument {
                remote_config: self.params.clone(),
                record: record.clone(),
            })
            .await
    }

    async fn update_document(&self, document_id: &str, record: &Record) -> WbgtResult<()> {
        self.provider
            .call(UpdateDocument {
                remote_config: self.params.clone(),
                document_id: document_id.to_string(),
                record: record.clone(),
            })
            .await
    }

    async fn query_by_record_id(&self, record_id: &str) -> WbgtResult<Vec<Document>> {
        self.provider
            .call(QueryDocuments {
                remote_config: self.params.clone(),
                record_id: record_id.to_string(),
            })
            .await
    }
}

/// A provider backed by a throwaway shell script in `dir`.
#[cfg(all(test, unix))]
pub(crate) fn script_provider(dir: &std::path::Path, body: &str) -> Provider {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("wbgt-remote-script");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    Provider::from_name("script").with_binary(path)
}

/// Params large enough that writing them blocks until the provider reads.
#[cfg(test)]
pub(crate) fn oversized_params() -> RemoteParams {
    let mut params = RemoteParams::new();
    params.insert("padding".into(), serde_json::json!("x".repeat(1 << 20)));
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_binary_name() {
        assert_eq!(Provider::from_name("file").binary_name(), "wbgt-remote-file");
    }

    #[test]
    fn test_params_come_from_config_table() {
        let mut params = HashMap::new();
        params.insert("path".to_string(), toml::Value::String("~/remote.json".into()));
        let remote = ProviderRemote::new(&RemoteConfig {
            provider: "file".into(),
            params,
        });

        assert_eq!(remote.provider().name(), "file");
        assert_eq!(remote.params["path"], "~/remote.json");
    }

    #[tokio::test]
    async fn test_missing_provider_binary() {
        let remote = ProviderRemote::new(&RemoteConfig {
            provider: "definitely-not-installed-anywhere".into(),
            params: HashMap::new(),
        });

        let result = remote.ping().await;
        assert!(matches!(result, Err(WbgtError::ProviderNotInstalled(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_crashing_provider_is_a_remote_error() {
        let dir = tempfile::tempdir().unwrap();
        let provider = script_provider(dir.path(), "exec 0<&-\nexit 1");
        let remote = ProviderRemote::with_provider(provider, oversized_params());

        let err = remote.list_documents().await.unwrap_err();
        assert!(matches!(err, WbgtError::Remote(_)), "got {:?}", err);
        assert!(err.is_remote());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_provider_error_response() {
        let dir = tempfile::tempdir().unwrap();
        let provider = script_provider(
            dir.path(),
            r#"cat > /dev/null
echo '{"status":"error","error":"store is locked"}'"#,
        );
        let remote = ProviderRemote::with_provider(provider, RemoteParams::new());

        let err = remote.ping().await.unwrap_err();
        assert!(matches!(err, WbgtError::Remote(msg) if msg == "store is locked"));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_hung_provider_is_killed_on_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let provider = script_provider(
            dir.path(),
            &format!("echo $$ > '{}'\nexec sleep 30", pid_file.display()),
        )
        .with_timeout(Duration::from_millis(500));
        let remote = ProviderRemote::with_provider(provider, RemoteParams::new());

        let err = remote.ping().await.unwrap_err();
        assert!(matches!(err, WbgtError::ProviderTimeout(_)));

        let pid = std::fs::read_to_string(&pid_file).unwrap();
        let stat = format!("/proc/{}/stat", pid.trim());
        let mut stopped = false;
        for _ in 0..50 {
            stopped = match std::fs::read_to_string(&stat) {
                Err(_) => true,
                // a zombie is dead, only waiting to be reaped
                Ok(line) => line
                    .rsplit(')')
                    .next()
                    .is_some_and(|rest| rest.trim_start().starts_with('Z')),
            };
            if stopped {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(stopped, "provider still running after timeout");
    }
}
