//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - resolves and validates the configuration
//! - installs logging
//! - runs the dashboard pipeline on a current-thread tokio runtime
//! - prints reports and writes optional exports

use chrono::Local;
use clap::Parser;
use tokio::runtime::Runtime;
use tracing::info;

use crate::app::pipeline::{CycleOutcome, Dashboard};
use crate::cli::{Command, DashArgs, ShowArgs};
use crate::config::DashConfig;
use crate::data::{DataFetcher, Endpoint, SeriesSource};
use crate::error::AppError;
use crate::render::Surface;
use crate::report::CheckReport;

pub mod pipeline;

/// Entry point for the `vdash` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine; flags and the process environment still apply.
    let _ = dotenvy::dotenv();

    // We want `vdash` and `vdash --source demo` to behave like `vdash tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Show(args) => handle_show(args),
        Command::Check(args) => handle_check(args),
    }
}

fn resolve(args: &DashArgs) -> Result<DashConfig, AppError> {
    DashConfig::from_args(args, Local::now().date_naive())
}

fn runtime() -> Result<Runtime, AppError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::new(4, format!("Failed to start async runtime: {e}")))
}

fn handle_tui(args: DashArgs) -> Result<(), AppError> {
    let config = resolve(&args)?;
    crate::logging::init_file(&config.log_file)?;
    info!(source = ?config.source, "starting dashboard");

    let runtime = runtime()?;
    crate::tui::run(&runtime, config.build_source(), config.dashboard_options())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let config = resolve(&args.dash)?;
    crate::logging::init_stderr();

    let runtime = runtime()?;
    let mut dashboard = Dashboard::new(config.build_source(), config.dashboard_options());
    let mut surface = Surface::with_dashboard_targets();

    let outcome = runtime
        .block_on(dashboard.on_ready(&mut surface))
        .ok_or_else(|| AppError::new(4, "Dashboard targets never became ready."))?;

    if let CycleOutcome::Failed(err) = outcome {
        return Err(AppError::new(4, err.to_string()));
    }
    if let Some(notice) = surface.notice() {
        eprintln!("{}", notice.message);
    }

    println!("{}", crate::report::format_dashboard(&surface, args.width, args.height));

    if let (Some(path), Some(merged)) = (&args.export, dashboard.last_merged()) {
        crate::io::export::write_merged_csv(path, merged)?;
        info!(path = %path.display(), "exported merged series");
    }

    Ok(())
}

fn handle_check(args: DashArgs) -> Result<(), AppError> {
    let config = resolve(&args)?;
    crate::logging::init_stderr();

    let runtime = runtime()?;
    let fetcher = DataFetcher::new(config.build_source());

    let (historical, forecast, server_stats) = runtime.block_on(async {
        tokio::join!(
            fetcher.fetch(Endpoint::Historical),
            fetcher.fetch(Endpoint::Predictions),
            fetcher.fetch_stats(),
        )
    });

    let report = CheckReport {
        source: fetcher.source().describe(),
        historical,
        forecast,
        server_stats,
    };
    println!("{}", crate::report::format_check(&report));

    if report.passed() {
        Ok(())
    } else {
        Err(AppError::new(4, "One or more endpoints failed."))
    }
}

/// Rewrite argv so `vdash` defaults to `vdash tui`.
///
/// Rules:
/// - `vdash`                      -> `vdash tui`
/// - `vdash --source demo ...`    -> `vdash tui --source demo ...`
/// - `vdash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "show" | "check");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_the_tui() {
        assert_eq!(rewrite_args(args(&["vdash"])), args(&["vdash", "tui"]));
        assert_eq!(
            rewrite_args(args(&["vdash", "--source", "demo"])),
            args(&["vdash", "tui", "--source", "demo"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(rewrite_args(args(&["vdash", "show"])), args(&["vdash", "show"]));
        assert_eq!(rewrite_args(args(&["vdash", "--help"])), args(&["vdash", "--help"]));
    }
}
