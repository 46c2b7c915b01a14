use anyhow::{Result, anyhow};
use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;
use wbgt_core::calendar::{calendar_events, events_in_month};
use wbgt_core::slot::today;

use super::load_records;
use crate::app::Engine;
use crate::render::Render;

pub async fn run(engine: &Engine, month: Option<&str>) -> Result<()> {
    let first = match month {
        Some(m) => parse_month(m)?,
        None => today().with_day(1).unwrap_or_else(today),
    };

    let records = load_records(engine).await?;
    let events = calendar_events(&records);
    let shown = events_in_month(&events, first.year(), first.month());

    println!("{}", first.format("%Y-%m").to_string().bold());
    if shown.is_empty() {
        println!("   {}", "No records".dimmed());
    }
    for event in shown {
        println!("   {}", event.render());
    }

    Ok(())
}

fn parse_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid month '{}'. Expected YYYY-MM", s))
}
