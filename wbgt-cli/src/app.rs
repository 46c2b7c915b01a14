//! Sync engine wiring from the config file.

use anyhow::Result;
use wbgt_core::config::WbgtConfig;
use wbgt_core::connectivity::Connectivity;
use wbgt_core::local::FileStore;
use wbgt_core::remote::ProviderRemote;
use wbgt_core::sync::SyncEngine;

use crate::utils::tui;

pub type Engine = SyncEngine<Option<ProviderRemote>, FileStore>;

pub struct App {
    pub engine: Engine,
    /// `--offline` or `offline = true`: the remote must never be contacted.
    pub forced_offline: bool,
}

/// Build the engine and decide whether we are online.
///
/// Online means: not forced offline, a remote is configured, and it answers.
pub async fn open(force_offline: bool) -> Result<App> {
    let config = WbgtConfig::load()?;
    let remote = config.remote.as_ref().map(ProviderRemote::new);
    let local = FileStore::new(config.cache_path());
    let engine = SyncEngine::new(remote, local, Connectivity::new(false));
    let forced_offline = force_offline || config.offline;

    if forced_offline {
        tracing::debug!("offline mode forced");
    } else if let Some(remote) = engine.remote() {
        let spinner = tui::create_spinner(format!("Contacting {}", remote.provider().name()));
        engine.connectivity().probe(remote).await;
        spinner.finish_and_clear();
    }

    Ok(App {
        engine,
        forced_offline,
    })
}
