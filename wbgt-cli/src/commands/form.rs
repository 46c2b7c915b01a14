//! Prompts shared by `add` and `edit`.
//!
//! Values given on the command line win. Missing ones are prompted for when
//! running interactively and otherwise left empty, so validation reports them.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use dialoguer::{Input, Select};
use owo_colors::OwoColorize;
use wbgt_core::record::Site;
use wbgt_core::slot::{TimeSlot, parse_date};
use wbgt_core::validate::Field;

/// Resolve a site by id or label, or let the user pick one.
pub fn resolve_site(
    arg: Option<&str>,
    sites: &[Site],
    default: Option<&Site>,
    interactive: bool,
) -> Result<Option<Site>> {
    if let Some(wanted) = arg {
        return sites
            .iter()
            .find(|s| s.id == wanted || s.label == wanted)
            .cloned()
            .map(Some)
            .ok_or_else(|| anyhow!("Unknown site '{}'. Run `wbgt sites` to list them", wanted));
    }

    if !interactive || sites.is_empty() {
        return Ok(default.cloned());
    }

    let labels: Vec<String> = sites.iter().map(|s| s.label.clone()).collect();
    let preselected = default
        .and_then(|d| sites.iter().position(|s| s.id == d.id))
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("  Site")
        .items(&labels)
        .default(preselected)
        .interact()?;

    Ok(Some(sites[selection].clone()))
}

pub fn resolve_date(arg: Option<&str>, default: NaiveDate) -> Result<NaiveDate> {
    match arg {
        Some(s) => parse_date(s).map_err(|e| anyhow!(e)),
        None => Ok(default),
    }
}

pub fn resolve_slot(arg: Option<&str>, default: TimeSlot, interactive: bool) -> Result<TimeSlot> {
    if let Some(s) = arg {
        return s.parse().map_err(|e: String| anyhow!(e));
    }
    if !interactive {
        return Ok(default);
    }

    let preselected = TimeSlot::ALL
        .iter()
        .position(|slot| *slot == default)
        .unwrap_or(0);
    let selection = Select::new()
        .with_prompt("  Time")
        .items(&TimeSlot::ALL)
        .default(preselected)
        .interact()?;

    Ok(TimeSlot::ALL[selection])
}

/// One measurement value. An empty answer leaves the field unset.
pub fn resolve_value(
    field: Field,
    arg: Option<f64>,
    default: Option<f64>,
    interactive: bool,
) -> Result<Option<f64>> {
    if arg.is_some() || !interactive {
        return Ok(arg.or(default));
    }

    loop {
        let answer: String = Input::new()
            .with_prompt(format!("  {}", field))
            .default(default.map(|v| v.to_string()).unwrap_or_default())
            .show_default(default.is_some())
            .interact_text()?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(None);
        }
        match answer.parse::<f64>() {
            Ok(value) => return Ok(Some(value)),
            Err(_) => eprintln!("  {}", format!("'{}' is not a number", answer).red()),
        }
    }
}
