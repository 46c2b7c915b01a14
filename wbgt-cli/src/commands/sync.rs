use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::app::Engine;
use crate::render::{Render, pluralize};
use crate::utils::tui::create_spinner;

pub async fn run(engine: &Engine) -> Result<()> {
    let pending = engine.pending_records().await?;

    if !engine.is_online() {
        println!("{}", "Offline, nothing was synced".yellow());
        if !pending.is_empty() {
            println!(
                "{} {} waiting to be pushed",
                pending.len(),
                pluralize("record", pending.len())
            );
        }
        return Ok(());
    }

    let spinner = create_spinner("Syncing records".to_string());
    let result = engine.fetch().await;
    spinner.finish_and_clear();

    let records = result.context("Sync failed")?;

    for record in &pending {
        println!("  {} {}", "↑".green(), record.render());
    }
    println!(
        "{}",
        format!(
            "Synced: {} {} pushed, {} {} in cache",
            pending.len(),
            pluralize("record", pending.len()),
            records.len(),
            pluralize("record", records.len())
        )
        .green()
    );

    let sites = engine
        .fetch_sites()
        .await
        .context("Records synced, but the site list could not be refreshed")?;
    tracing::debug!(count = sites.len(), "site list refreshed");

    Ok(())
}
