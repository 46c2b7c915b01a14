use anyhow::{Context, Result, anyhow, bail};
use owo_colors::OwoColorize;
use wbgt_core::validate::{Field, RecordDraft, ensure_editable};

use super::{form, load_records};
use crate::MeasurementArgs;
use crate::app::Engine;
use crate::render::Render;
use crate::utils::tui::create_spinner;

pub async fn run(engine: &Engine, id: &str, args: MeasurementArgs) -> Result<()> {
    let interactive = args.is_empty();

    let records = load_records(engine).await?;
    let original = records
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| anyhow!("No record with id '{}'", id))?;

    ensure_editable(original, engine.is_online())?;

    println!("  {}", original.render());

    let sites = if args.site.is_some() || interactive {
        engine.fetch_sites().await.context("Failed to load sites")?
    } else {
        Vec::new()
    };

    let current = RecordDraft::from_record(original);
    let draft = RecordDraft {
        site: if interactive || args.site.is_some() {
            form::resolve_site(args.site.as_deref(), &sites, current.site.as_ref(), interactive)?
        } else {
            current.site.clone()
        },
        date: form::resolve_date(args.date.as_deref(), current.date)?,
        time: form::resolve_slot(args.time.as_deref(), current.time, interactive)?,
        temperature: form::resolve_value(
            Field::Temperature,
            args.temperature,
            current.temperature,
            interactive,
        )?,
        humidity: form::resolve_value(Field::Humidity, args.humidity, current.humidity, interactive)?,
        wbgt: form::resolve_value(Field::Wbgt, args.wbgt, current.wbgt, interactive)?,
    };

    let edited = match draft.into_edited_record(original, &records) {
        Ok(record) => record,
        Err(e) => bail!("{}", e.render()),
    };

    let spinner = create_spinner("Saving".to_string());
    let result = engine.update_record(edited).await;
    spinner.finish_and_clear();
    let records = result.context("Failed to update the record")?;

    if interactive {
        println!();
    }
    if let Some(saved) = records.iter().find(|r| r.id == id) {
        if saved.sync_status {
            println!("{}", "  Updated".green());
        } else {
            println!("{}", "  Updated locally, will sync when online".yellow());
        }
        println!("  {}", saved.render());
    }

    Ok(())
}
