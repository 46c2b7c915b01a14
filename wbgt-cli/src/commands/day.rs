use anyhow::Result;
use owo_colors::OwoColorize;
use wbgt_core::detail::day_detail;
use wbgt_core::slot::today;

use super::{form, load_records};
use crate::app::Engine;
use crate::render::Render;

pub async fn run(engine: &Engine, date: Option<&str>) -> Result<()> {
    let date = form::resolve_date(date, today())?;

    let records = load_records(engine).await?;
    let groups = day_detail(&records, date);

    println!("{}", date.format("%Y-%m-%d %a").to_string().bold());
    if groups.is_empty() {
        println!("   {}", "No records".dimmed());
        return Ok(());
    }

    for (i, group) in groups.iter().enumerate() {
        println!("{}", group.render());
        if i < groups.len() - 1 {
            println!();
        }
    }

    Ok(())
}
