//! TUI rendering traits for wbgt types.
//!
//! Extension traits that add colored terminal rendering to wbgt-core types
//! using owo_colors.

use owo_colors::OwoColorize;
use wbgt_core::calendar::{CalendarEvent, ColorTag};
use wbgt_core::detail::DetailGroup;
use wbgt_core::heat::HeatLevel;
use wbgt_core::record::{Record, Site};
use wbgt_core::validate::ValidationError;

pub trait Render {
    fn render(&self) -> String;
}

/// Colour a WBGT value by its heat level.
fn colorize_wbgt(wbgt: f64) -> String {
    let text = format!("{:>5.1}", wbgt);
    match HeatLevel::from_wbgt(wbgt) {
        HeatLevel::Safe => text.blue().to_string(),
        HeatLevel::Caution => text.cyan().to_string(),
        HeatLevel::Alert => text.yellow().to_string(),
        HeatLevel::Severe => text.magenta().to_string(),
        HeatLevel::Danger => text.red().bold().to_string(),
        HeatLevel::Unknown => text.dimmed().to_string(),
    }
}

fn sync_marker(record: &Record) -> String {
    if record.sync_status {
        "●".green().to_string()
    } else {
        "○".yellow().to_string()
    }
}

impl Render for Record {
    fn render(&self) -> String {
        format!(
            "{} {:>5}  WBGT {}  {:>4.1}°C  {:>5.1}%  {}",
            sync_marker(self),
            self.record_time.to_string(),
            colorize_wbgt(self.wbgt),
            self.temperature,
            self.humidity,
            self.id.dimmed()
        )
    }
}

impl Render for Site {
    fn render(&self) -> String {
        format!("🏗  {} {}", self.label, format!("({})", self.id).dimmed())
    }
}

impl Render for CalendarEvent {
    fn render(&self) -> String {
        let date = self.date.format("%Y-%m-%d %a").to_string();
        match self.color {
            ColorTag::Warning => format!("{}  {} {}", date, self.title.red(), "⚠".red()),
            ColorTag::Normal => format!("{}  {}", date, self.title),
        }
    }
}

impl Render for DetailGroup {
    fn render(&self) -> String {
        let mut lines = vec![self.site.render()];
        lines.extend(self.records.iter().map(|r| format!("   {}", r.render())));
        lines.join("\n")
    }
}

impl Render for ValidationError {
    fn render(&self) -> String {
        match self {
            ValidationError::Incomplete(errors) => {
                let mut lines = vec![self.to_string().red().to_string()];
                lines.extend(errors.iter().map(|e| format!("  - {}", e)));
                lines.join("\n")
            }
            ValidationError::Duplicate { .. } => self.to_string().red().to_string(),
        }
    }
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
