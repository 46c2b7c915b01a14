use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use wbgt_core::slot::{TimeSlot, today};
use wbgt_core::validate::{Field, RecordDraft};

use super::{form, load_records};
use crate::MeasurementArgs;
use crate::app::Engine;
use crate::render::Render;
use crate::utils::tui::create_spinner;

pub async fn run(engine: &Engine, args: MeasurementArgs) -> Result<()> {
    let interactive = !args.has_all_values();

    let records = load_records(engine).await?;
    let sites = engine.fetch_sites().await.context("Failed to load sites")?;
    let last_site = engine.last_site().await?;

    let site = form::resolve_site(args.site.as_deref(), &sites, last_site.as_ref(), interactive)?;
    if let Some(site) = &site {
        engine.remember_site(site).await?;
    }

    let draft = RecordDraft {
        site,
        date: form::resolve_date(args.date.as_deref(), today())?,
        time: form::resolve_slot(args.time.as_deref(), TimeSlot::current(), interactive)?,
        temperature: form::resolve_value(Field::Temperature, args.temperature, None, interactive)?,
        humidity: form::resolve_value(Field::Humidity, args.humidity, None, interactive)?,
        wbgt: form::resolve_value(Field::Wbgt, args.wbgt, None, interactive)?,
    };

    let record = match draft.into_new_record(&records) {
        Ok(record) => record,
        Err(e) => bail!("{}", e.render()),
    };
    let id = record.id.clone();

    let spinner = create_spinner("Saving".to_string());
    let result = engine.add_record(record).await;
    spinner.finish_and_clear();
    let records = result.context("Failed to save the record")?;

    if interactive {
        println!();
    }
    match records.iter().find(|r| r.id == id) {
        Some(saved) if saved.sync_status => {
            println!("{}", "  Saved".green());
            println!("  {}", saved.render());
        }
        Some(saved) => {
            println!("{}", "  Saved locally, will sync when online".yellow());
            println!("  {}", saved.render());
        }
        None => {}
    }

    Ok(())
}
