mod app;
mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "wbgt")]
#[command(about = "Record WBGT measurements per construction site, online or offline")]
struct Cli {
    /// Do not contact the remote store
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Measurement values shared by `add` and `edit`.
#[derive(Args, Default)]
pub struct MeasurementArgs {
    /// Site id or label
    #[arg(short, long)]
    pub site: Option<String>,

    /// Measurement date (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Time slot: 8:00, 10:00 or 13:00
    #[arg(short, long)]
    pub time: Option<String>,

    /// Air temperature in °C
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Relative humidity in %
    #[arg(long)]
    pub humidity: Option<f64>,

    /// WBGT in °C
    #[arg(long)]
    pub wbgt: Option<f64>,
}

impl MeasurementArgs {
    pub fn is_empty(&self) -> bool {
        self.site.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.temperature.is_none()
            && self.humidity.is_none()
            && self.wbgt.is_none()
    }

    pub fn has_all_values(&self) -> bool {
        self.temperature.is_some() && self.humidity.is_some() && self.wbgt.is_some()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Push pending records and refresh the local cache
    Sync,
    /// Show one event per site and day for a month
    Calendar {
        /// Month to show (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Show the readings of one day, grouped by site
    Day {
        /// Date (YYYY-MM-DD), defaults to today
        date: Option<String>,
    },
    /// Record a new measurement
    Add(MeasurementArgs),
    /// Edit an existing measurement
    Edit {
        /// Record id
        id: String,

        #[command(flatten)]
        values: MeasurementArgs,
    },
    /// List construction sites
    Sites,
    /// Show connectivity and pending records
    Status,
    /// Re-sync whenever the remote becomes reachable again
    Watch {
        /// Seconds between connectivity checks
        #[arg(short, long, default_value_t = 30)]
        interval: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app = app::open(cli.offline).await?;
    let engine = &app.engine;

    match cli.command {
        Commands::Sync => commands::sync::run(engine).await,
        Commands::Calendar { month } => commands::calendar::run(engine, month.as_deref()).await,
        Commands::Day { date } => commands::day::run(engine, date.as_deref()).await,
        Commands::Add(values) => commands::add::run(engine, values).await,
        Commands::Edit { id, values } => commands::edit::run(engine, &id, values).await,
        Commands::Sites => commands::sites::run(engine).await,
        Commands::Status => commands::status::run(engine).await,
        Commands::Watch { interval } => {
            commands::watch::run(engine, app.forced_offline, interval).await
        }
    }
}
