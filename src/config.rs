//! Resolved, validated dashboard configuration.
//!
//! `DashArgs` is what the user typed (flags, env, `.env`); `DashConfig` is what
//! the pipeline runs with. Invalid combinations are usage errors (exit code 2).

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;

use crate::app::pipeline::DashboardOptions;
use crate::cli::DashArgs;
use crate::data::{AnySource, DemoSource, FileSource, HttpSource};
use crate::domain::{ChartMode, SourceKind};
use crate::error::AppError;
use crate::gate::GateConfig;
use crate::render::{ChartStyle, Palette, TableScope};

/// Upper bound for `--history-days` and `--recent-days` (ten years).
pub const MAX_DAYS: usize = 3650;

#[derive(Debug, Clone, PartialEq)]
pub struct DashConfig {
    pub source: SourceConfig,
    pub history_days: usize,
    pub recent_days: usize,
    pub mode: ChartMode,
    pub table_scope: TableScope,
    pub gate: GateConfig,
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    Http { base_url: String },
    File { dir: PathBuf },
    Demo { seed: u64, last_observed: NaiveDate },
}

impl DashConfig {
    /// Validate `args`. `today` anchors the demo source when no end day is given.
    pub fn from_args(args: &DashArgs, today: NaiveDate) -> Result<Self, AppError> {
        if args.history_days == 0 {
            return Err(usage("--history-days must be at least 1"));
        }
        if args.recent_days == 0 {
            return Err(usage("--recent-days must be at least 1"));
        }
        if args.history_days > MAX_DAYS || args.recent_days > MAX_DAYS {
            return Err(usage(format!("--history-days and --recent-days are limited to {MAX_DAYS}")));
        }
        if args.gate_attempts == 0 {
            return Err(usage("--gate-attempts must be at least 1"));
        }

        let source = match args.source {
            SourceKind::Http => {
                let base_url = args.base_url.trim().trim_end_matches('/').to_string();
                if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                    return Err(usage(format!(
                        "base URL must start with http:// or https:// (got '{}')",
                        args.base_url
                    )));
                }
                SourceConfig::Http { base_url }
            }
            SourceKind::File => {
                let Some(dir) = &args.data_dir else {
                    return Err(usage("--source file requires --data-dir"));
                };
                if !dir.is_dir() {
                    return Err(usage(format!("data directory '{}' does not exist", dir.display())));
                }
                SourceConfig::File { dir: dir.clone() }
            }
            SourceKind::Demo => SourceConfig::Demo {
                seed: args.seed,
                last_observed: args.demo_end.unwrap_or_else(|| today.pred_opt().unwrap_or(today)),
            },
        };

        Ok(Self {
            source,
            history_days: args.history_days,
            recent_days: args.recent_days,
            mode: args.mode,
            table_scope: args.table,
            gate: GateConfig {
                max_attempts: args.gate_attempts,
                delay: Duration::from_millis(args.gate_delay_ms),
            },
            log_file: args.log_file.clone(),
        })
    }

    pub fn build_source(&self) -> AnySource {
        match &self.source {
            SourceConfig::Http { base_url } => AnySource::Http(HttpSource::new(base_url.clone())),
            SourceConfig::File { dir } => AnySource::File(FileSource::new(dir.clone())),
            SourceConfig::Demo { seed, last_observed } => {
                // The single chart may reach further back than the history window.
                let days = self.history_days.max(self.recent_days);
                AnySource::Demo(DemoSource::new(*seed, *last_observed, days))
            }
        }
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            chart: ChartStyle {
                mode: self.mode,
                palette: Palette::default(),
                recent_days: self.recent_days,
            },
            table_scope: self.table_scope,
            history_days: self.history_days,
            gate: self.gate,
        }
    }
}

fn usage(message: impl Into<String>) -> AppError {
    AppError::new(2, message)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: DashArgs,
    }

    fn parse(argv: &[&str]) -> DashArgs {
        let mut full = vec!["vdash"];
        full.extend_from_slice(argv);
        Harness::parse_from(full).args
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn demo_source_defaults_to_yesterday() {
        let config = DashConfig::from_args(&parse(&["--source", "demo", "--seed", "7"]), today()).unwrap();
        assert_eq!(
            config.source,
            SourceConfig::Demo {
                seed: 7,
                last_observed: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
            }
        );
        assert_eq!(config.gate.delay, Duration::from_millis(50));
        assert_eq!(config.dashboard_options().history_days, 30);
    }

    #[test]
    fn base_url_is_normalised() {
        let args = parse(&["--source", "http", "--base-url", "http://dash.local:8080/"]);
        let config = DashConfig::from_args(&args, today()).unwrap();
        assert_eq!(
            config.source,
            SourceConfig::Http {
                base_url: "http://dash.local:8080".to_string()
            }
        );
    }

    #[test]
    fn zero_windows_and_attempts_are_usage_errors() {
        for argv in [["--history-days", "0"], ["--recent-days", "0"], ["--gate-attempts", "0"]] {
            let err = DashConfig::from_args(&parse(&argv), today()).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{argv:?}");
        }
    }

    #[test]
    fn oversized_windows_are_usage_errors() {
        for argv in [["--history-days", "99999999999"], ["--recent-days", "3651"]] {
            let err = DashConfig::from_args(&parse(&argv), today()).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{argv:?}");
        }
        assert!(DashConfig::from_args(&parse(&["--history-days", "3650"]), today()).is_ok());
    }

    #[test]
    fn demo_history_covers_the_single_chart() {
        let args = parse(&["--source", "demo", "--history-days", "5", "--recent-days", "10"]);
        let config = DashConfig::from_args(&args, today()).unwrap();
        let AnySource::Demo(demo) = config.build_source() else {
            panic!("expected the demo source");
        };
        assert_eq!(demo.historical().len(), 10);
        assert_eq!(config.dashboard_options().history_days, 5);
    }

    #[test]
    fn file_source_needs_an_existing_directory() {
        let err = DashConfig::from_args(&parse(&["--source", "file"]), today()).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let dir = tempfile::tempdir().unwrap();
        let dir_arg = dir.path().to_str().unwrap();
        let config = DashConfig::from_args(&parse(&["--source", "file", "--data-dir", dir_arg]), today()).unwrap();
        assert!(matches!(config.build_source(), AnySource::File(_)));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let err = DashConfig::from_args(&parse(&["--base-url", "ftp://x"]), today()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
