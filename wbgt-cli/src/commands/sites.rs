use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::app::Engine;
use crate::render::Render;

pub async fn run(engine: &Engine) -> Result<()> {
    let sites = engine.fetch_sites().await.context("Failed to load sites")?;
    let last = engine.last_site().await?;

    if sites.is_empty() {
        println!("{}", "No sites known yet. Connect to the remote and run `wbgt sync`".dimmed());
        return Ok(());
    }

    for site in &sites {
        let marker = if last.as_ref().is_some_and(|l| l.id == site.id) {
            "*".green().to_string()
        } else {
            " ".to_string()
        };
        println!("{} {}", marker, site.render());
    }

    Ok(())
}
