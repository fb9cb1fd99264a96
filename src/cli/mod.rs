//! Command-line parsing for the poultry-demand dashboard.
//!
//! Parsing stays here; resolution and validation of the parsed values happen
//! in `crate::config`, dispatch in `crate::app`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{ChartMode, SourceKind};
use crate::render::TableScope;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "vdash", version, about = "Poultry demand dashboard (history vs. forecast)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard.
    ///
    /// `r` re-runs the pipeline, `m` toggles the chart mode, `q` quits.
    Tui(DashArgs),
    /// Run the pipeline once and print stat cards, chart and table.
    Show(ShowArgs),
    /// Fetch every endpoint and print a short validation report.
    Check(DashArgs),
}

/// Options shared by every command.
#[derive(Debug, Args, Clone)]
pub struct DashArgs {
    /// Base URL of the prediction API.
    #[arg(long, env = "VDASH_BASE_URL", default_value = "http://127.0.0.1:5000")]
    pub base_url: String,

    /// Where series come from.
    #[arg(long, env = "VDASH_SOURCE", value_enum, default_value_t = SourceKind::Http)]
    pub source: SourceKind,

    /// Directory with historical.json / predictions.json / stats.json (file source).
    #[arg(long, env = "VDASH_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Historical days kept in the combined chart.
    #[arg(long, default_value_t = 30)]
    pub history_days: usize,

    /// Days shown by the single-series chart.
    #[arg(long, default_value_t = 30)]
    pub recent_days: usize,

    /// Chart mode.
    #[arg(long, value_enum, default_value_t = ChartMode::Combined)]
    pub mode: ChartMode,

    /// Rows shown in the table.
    #[arg(long, value_enum, default_value_t = TableScope::Forecast)]
    pub table: TableScope,

    /// Readiness probes before giving up.
    #[arg(long, default_value_t = crate::gate::DEFAULT_MAX_ATTEMPTS)]
    pub gate_attempts: u32,

    /// Delay between readiness probes (milliseconds).
    #[arg(long, default_value_t = 50)]
    pub gate_delay_ms: u64,

    /// Seed for the demo source.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Last observed day of the demo source (defaults to yesterday).
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub demo_end: Option<NaiveDate>,

    /// Log file used by the TUI.
    #[arg(long, env = "VDASH_LOG_FILE", default_value = "vdash.log")]
    pub log_file: PathBuf,
}

/// Options for the one-shot text dashboard.
#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub dash: DashArgs,

    /// Chart width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the merged series to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}
