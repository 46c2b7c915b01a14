use anyhow::Result;
use owo_colors::OwoColorize;

use crate::app::Engine;
use crate::render::{Render, pluralize};

pub async fn run(engine: &Engine) -> Result<()> {
    match engine.remote() {
        Some(remote) if engine.is_online() => {
            println!("{} {}", "● online".green(), remote.provider().name().dimmed())
        }
        Some(remote) => {
            println!("{} {}", "○ offline".yellow(), remote.provider().name().dimmed())
        }
        None => println!("{} {}", "○ offline".yellow(), "(no remote configured)".dimmed()),
    }

    let pending = engine.pending_records().await?;
    if pending.is_empty() {
        println!("   {}", "Everything is synced".dimmed());
        return Ok(());
    }

    println!(
        "   {} {} not yet synced:",
        pending.len(),
        pluralize("record", pending.len())
    );
    for record in &pending {
        println!(
            "   {} {} {}",
            record.record_date,
            record.site_ref.label,
            record.render()
        );
    }

    Ok(())
}
