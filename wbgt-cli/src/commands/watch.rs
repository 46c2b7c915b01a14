use std::time::Duration;

use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use wbgt_core::remote::ProviderRemote;

use crate::app::Engine;
use crate::render::pluralize;

/// Re-probe the remote every `interval` seconds and re-sync when it comes back.
pub async fn run(engine: &Engine, forced_offline: bool, interval: u64) -> Result<()> {
    let remote = watched_remote(engine, forced_offline)?;

    let mut changes = engine.connectivity().subscribe();
    let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));

    println!(
        "Watching {} (every {}s, ctrl-c to stop)",
        remote.provider().name(),
        interval.max(1)
    );
    if engine.is_online() {
        sync_once(engine).await;
    }

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                engine.connectivity().probe(remote).await;
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                if *changes.borrow_and_update() {
                    println!("{}", "● back online".green());
                    sync_once(engine).await;
                } else {
                    println!("{}", "○ offline, changes are kept locally".yellow());
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

/// The remote to probe, unless probing is not allowed at all.
fn watched_remote(engine: &Engine, forced_offline: bool) -> Result<&ProviderRemote> {
    if forced_offline {
        bail!("Offline mode is forced (--offline or `offline = true` in the config)");
    }
    match engine.remote() {
        Some(remote) => Ok(remote),
        None => bail!("No remote configured, nothing to watch"),
    }
}

async fn sync_once(engine: &Engine) {
    let pending = match engine.pending_records().await {
        Ok(pending) => pending.len(),
        Err(e) => {
            eprintln!("   {}", e.to_string().red());
            return;
        }
    };

    match engine.fetch().await {
        Ok(records) => println!(
            "   synced {} pending {}, {} in cache",
            pending,
            pluralize("record", pending),
            records.len()
        ),
        Err(e) => {
            tracing::warn!(error = %e, "sync after reconnect failed");
            eprintln!("   {}", e.to_string().red());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use wbgt_core::connectivity::Connectivity;
    use wbgt_core::local::FileStore;
    use wbgt_core::remote::RemoteConfig;
    use wbgt_core::sync::SyncEngine;

    fn engine(remote: Option<ProviderRemote>) -> Engine {
        let cache = std::env::temp_dir().join("wbgt-watch-test");
        SyncEngine::new(remote, FileStore::new(cache), Connectivity::new(false))
    }

    fn file_remote() -> ProviderRemote {
        ProviderRemote::new(&RemoteConfig {
            provider: "file".into(),
            params: HashMap::new(),
        })
    }

    #[test]
    fn test_forced_offline_never_watches() {
        let engine = engine(Some(file_remote()));
        assert!(watched_remote(&engine, true).is_err());
        assert!(!engine.is_online());
    }

    #[test]
    fn test_watch_needs_a_remote() {
        assert!(watched_remote(&engine(None), false).is_err());
    }

    #[test]
    fn test_watch_configured_remote() {
        let engine = engine(Some(file_remote()));
        let remote = watched_remote(&engine, false).unwrap();
        assert_eq!(remote.provider().name(), "file");
    }
}
