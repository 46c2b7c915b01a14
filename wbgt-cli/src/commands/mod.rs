pub mod add;
pub mod calendar;
pub mod day;
pub mod edit;
pub mod form;
pub mod sites;
pub mod status;
pub mod sync;
pub mod watch;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use wbgt_core::record::Record;

use crate::app::Engine;
use crate::utils::tui::create_spinner;

/// Fetch the record set, falling back to the local cache when the remote fails.
pub async fn load_records(engine: &Engine) -> Result<Vec<Record>> {
    let spinner = engine
        .is_online()
        .then(|| create_spinner("Syncing records".to_string()));
    let outcome = engine
        .fetch_or_cached()
        .await
        .context("Failed to read the local cache")?;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if let Some(e) = &outcome.load_error {
        eprintln!(
            "{}",
            format!("Showing cached records, the remote failed: {}", e).yellow()
        );
    }

    Ok(outcome.records)
}
