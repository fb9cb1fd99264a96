//! The dashboard pipeline shared by the TUI and the `show` command.
//!
//! readiness gate -> fetch (both endpoints, concurrently) -> align + stats -> render
//!
//! A cycle either updates every target or none of them: fetch failures and
//! missing targets leave the previous render in place and put a notice on
//! the surface instead. Every cycle takes a ticket; data arriving for a ticket
//! that is no longer the newest is dropped.

use thiserror::Error;
use tracing::{error, info, warn};

use crate::data::{DataFetcher, FetchedSeries, SeriesSource};
use crate::domain::{ChartMode, MergedSeries, Series, SummaryStats};
use crate::error::{FetchError, RenderError};
use crate::gate::{GateConfig, GateOutcome, ReadinessGate};
use crate::render::surface::{NoticeLevel, dashboard_targets};
use crate::render::table::{rows_from_merged, rows_from_series};
use crate::render::{ChartRenderer, ChartStyle, Surface, TableRenderer, TableScope, render_summary};
use crate::render::{CHART_TARGET, TABLE_TARGET};
use crate::series::{merge, summarize};

/// Everything that parameterises a dashboard page.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOptions {
    pub chart: ChartStyle,
    pub table_scope: TableScope,
    /// Historical days kept in the combined chart.
    pub history_days: usize,
    pub gate: GateConfig,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            chart: ChartStyle::default(),
            table_scope: TableScope::Forecast,
            history_days: 30,
            gate: GateConfig::default(),
        }
    }
}

/// Identifies one pipeline cycle. Later cycles compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// What a successful cycle put on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub ticket: Ticket,
    pub historical_days: usize,
    pub forecast_days: usize,
    pub stats: SummaryStats,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Rendered(CycleReport),
    Failed(CycleError),
    /// A newer cycle started while this one was fetching.
    Stale,
}

/// Data of the last successful cycle, kept for redraws without a fetch.
struct LastCycle {
    historical: Series,
    forecast: Series,
    merged: MergedSeries,
}

pub struct Dashboard<S> {
    fetcher: DataFetcher<S>,
    chart: ChartRenderer,
    table: TableRenderer,
    table_scope: TableScope,
    history_days: usize,
    gate: ReadinessGate,
    latest: u64,
    last: Option<LastCycle>,
}

impl<S: SeriesSource> Dashboard<S> {
    pub fn new(source: S, options: DashboardOptions) -> Self {
        Self {
            fetcher: DataFetcher::new(source),
            chart: ChartRenderer::new(CHART_TARGET, options.chart),
            table: TableRenderer::new(TABLE_TARGET),
            table_scope: options.table_scope,
            history_days: options.history_days,
            gate: ReadinessGate::new(options.gate),
            latest: 0,
            last: None,
        }
    }

    pub fn mode(&self) -> ChartMode {
        self.chart.style().mode
    }

    /// Readiness signal: run the first cycle once every target exists.
    ///
    /// Returns `None` when the gate was already consumed or gave up.
    pub async fn on_ready(&mut self, surface: &mut Surface) -> Option<CycleOutcome> {
        let required = dashboard_targets();
        let outcome = self
            .gate
            .wait(|| surface.missing(&required).into_iter().map(str::to_string).collect())
            .await;

        match outcome {
            GateOutcome::Opened { .. } => Some(self.refresh(surface).await),
            GateOutcome::GaveUp(_) | GateOutcome::Consumed => None,
        }
    }

    /// Run one full cycle (manual re-trigger).
    pub async fn refresh(&mut self, surface: &mut Surface) -> CycleOutcome {
        let ticket = self.begin_cycle();
        info!(source = %self.fetcher.source().describe(), "refreshing dashboard");
        let fetched = self.fetcher.fetch_both().await;
        self.apply(surface, ticket, fetched)
    }

    /// Start a cycle; invalidates every earlier ticket.
    pub fn begin_cycle(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// Render fetched data for `ticket`, unless a newer cycle has started.
    pub fn apply(
        &mut self,
        surface: &mut Surface,
        ticket: Ticket,
        fetched: Result<FetchedSeries, FetchError>,
    ) -> CycleOutcome {
        if ticket.0 != self.latest {
            warn!(ticket = ticket.0, latest = self.latest, "discarding stale response");
            return CycleOutcome::Stale;
        }

        let result = fetched
            .map_err(CycleError::from)
            .and_then(|data| self.render(surface, ticket, data));

        match result {
            Ok(report) => {
                info!(
                    ticket = ticket.0,
                    historical_days = report.historical_days,
                    forecast_days = report.forecast_days,
                    "dashboard updated"
                );
                CycleOutcome::Rendered(report)
            }
            Err(err) => {
                error!(ticket = ticket.0, error = %err, "dashboard update failed");
                surface.set_notice(NoticeLevel::Error, format!("Gagal memuat prediksi: {err}"));
                CycleOutcome::Failed(err)
            }
        }
    }

    /// Switch chart mode and redraw from the last successful data.
    pub fn set_mode(&mut self, surface: &mut Surface, mode: ChartMode) -> Result<(), RenderError> {
        self.chart.set_mode(mode);
        if let Some(last) = &self.last {
            let input = self.chart_input(last);
            self.chart.render(surface, &input)?;
        }
        Ok(())
    }

    /// What the chart is drawn from in the current mode.
    ///
    /// The combined chart shows the history window next to the forecast; the
    /// single chart takes its recent days from the full history, so
    /// `recent_days` is not capped by `history_days`.
    fn chart_input(&self, last: &LastCycle) -> MergedSeries {
        match self.chart.style().mode {
            ChartMode::Combined => last.merged.clone(),
            ChartMode::Single => merge(
                &last.historical.last_days(self.chart.style().recent_days),
                &last.forecast,
            ),
        }
    }

    fn render(
        &mut self,
        surface: &mut Surface,
        ticket: Ticket,
        data: FetchedSeries,
    ) -> Result<CycleReport, CycleError> {
        // Nothing is written unless every target is there with the right kind.
        if let Some(missing) = surface.missing(&dashboard_targets()).first() {
            return Err(RenderError::TargetMissing(missing.to_string()).into());
        }

        let window = data.historical.last_days(self.history_days);
        let merged = merge(&window, &data.forecast);
        let stats = summarize(&data.forecast);
        let rows = match self.table_scope {
            TableScope::Forecast => rows_from_series(&data.forecast, true),
            TableScope::Merged => rows_from_merged(&merged),
        };

        let last = LastCycle {
            historical: data.historical,
            forecast: data.forecast,
            merged,
        };
        let chart_input = self.chart_input(&last);

        render_summary(surface, &stats)?;
        self.chart.render(surface, &chart_input)?;
        self.table.render(surface, rows)?;

        if last.forecast.is_empty() {
            surface.set_notice(NoticeLevel::Info, "Belum ada data prediksi");
        } else {
            surface.clear_notice();
        }

        let report = CycleReport {
            ticket,
            historical_days: window.len(),
            forecast_days: last.forecast.len(),
            stats,
        };
        self.last = Some(last);
        Ok(report)
    }

    /// Merged series of the last successful cycle.
    pub fn last_merged(&self) -> Option<&MergedSeries> {
        self.last.as_ref().map(|last| &last.merged)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{Category, DailyObservation, PerCategory, Series, SeriesKind};

    struct NoSource;

    impl SeriesSource for NoSource {
        async fn get(&self, _: crate::data::Endpoint) -> Result<Vec<u8>, FetchError> {
            Err(FetchError::Transport("offline".to_string()))
        }

        fn describe(&self) -> String {
            "none".to_string()
        }
    }

    fn series(kind: SeriesKind, first_day: u32, potong: &[f64]) -> Series {
        let obs = potong
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let date = NaiveDate::from_ymd_opt(2025, 1, first_day + i as u32).unwrap();
                DailyObservation::new(date, PerCategory::from_fn(|_| Some(p)))
            })
            .collect();
        Series::new(kind, obs).unwrap()
    }

    fn fetched() -> FetchedSeries {
        FetchedSeries {
            historical: series(SeriesKind::Historical, 1, &[1.0, 2.0, 3.0, 4.0]),
            forecast: series(SeriesKind::Forecast, 5, &[5.0, 6.0]),
        }
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let mut dash = Dashboard::new(NoSource, DashboardOptions::default());
        let mut surface = Surface::with_dashboard_targets();

        let older = dash.begin_cycle();
        let newer = dash.begin_cycle();
        assert!(newer > older);

        assert_eq!(dash.apply(&mut surface, older, Ok(fetched())), CycleOutcome::Stale);
        assert!(surface.table(TABLE_TARGET).unwrap().is_empty());
        assert!(surface.canvas(CHART_TARGET).unwrap().live().is_none());

        assert!(matches!(
            dash.apply(&mut surface, newer, Ok(fetched())),
            CycleOutcome::Rendered(_)
        ));
        assert_eq!(surface.table(TABLE_TARGET).unwrap().len(), 2);
    }

    #[test]
    fn history_window_limits_the_merged_series() {
        let options = DashboardOptions {
            history_days: 2,
            table_scope: TableScope::Merged,
            ..DashboardOptions::default()
        };
        let mut dash = Dashboard::new(NoSource, options);
        let mut surface = Surface::with_dashboard_targets();
        let ticket = dash.begin_cycle();

        let CycleOutcome::Rendered(report) = dash.apply(&mut surface, ticket, Ok(fetched())) else {
            panic!("expected a render");
        };
        assert_eq!(report.historical_days, 2);
        assert_eq!(dash.last_merged().unwrap().len(), 4);
        assert_eq!(surface.table(TABLE_TARGET).unwrap().len(), 4);
        assert_eq!(report.stats.mean(Category::Potong), Some(5.5));
        assert_eq!(surface.text("statPotong"), Some("5.5"));
    }

    #[test]
    fn missing_target_renders_nothing() {
        let mut dash = Dashboard::new(NoSource, DashboardOptions::default());
        let mut surface = Surface::new();
        surface.register(CHART_TARGET, crate::render::TargetKind::Canvas);
        let ticket = dash.begin_cycle();

        let outcome = dash.apply(&mut surface, ticket, Ok(fetched()));
        assert!(matches!(outcome, CycleOutcome::Failed(CycleError::Render(_))));
        assert!(surface.canvas(CHART_TARGET).unwrap().attached().is_empty());
        assert_eq!(surface.notice().map(|n| n.level), Some(NoticeLevel::Error));
    }

    #[test]
    fn wrong_kind_target_leaves_every_target_untouched() {
        let mut dash = Dashboard::new(NoSource, DashboardOptions::default());
        let mut surface = Surface::new();
        surface.register(CHART_TARGET, crate::render::TargetKind::Text);
        surface.register(TABLE_TARGET, crate::render::TargetKind::TableBody);
        for category in Category::ALL {
            surface.register(crate::render::surface::stat_target(category), crate::render::TargetKind::Text);
        }
        let ticket = dash.begin_cycle();

        let outcome = dash.apply(&mut surface, ticket, Ok(fetched()));
        assert_eq!(
            outcome,
            CycleOutcome::Failed(CycleError::Render(RenderError::TargetMissing(CHART_TARGET.to_string())))
        );
        assert_eq!(surface.text("statPotong"), Some(""));
        assert!(surface.table(TABLE_TARGET).unwrap().is_empty());
        assert!(dash.last_merged().is_none());
    }

    #[test]
    fn single_chart_reaches_past_the_history_window() {
        let options = DashboardOptions {
            chart: ChartStyle {
                mode: ChartMode::Single,
                recent_days: 3,
                ..ChartStyle::default()
            },
            history_days: 2,
            ..DashboardOptions::default()
        };
        let mut dash = Dashboard::new(NoSource, options);
        let mut surface = Surface::with_dashboard_targets();
        let ticket = dash.begin_cycle();

        let CycleOutcome::Rendered(report) = dash.apply(&mut surface, ticket, Ok(fetched())) else {
            panic!("expected a render");
        };
        assert_eq!(report.historical_days, 2);
        let spec = surface.canvas(CHART_TARGET).unwrap().live().unwrap().spec().clone();
        assert_eq!(spec.labels.len(), 3);
        assert_eq!(spec.datasets[0].values, vec![Some(2.0), Some(3.0), Some(4.0)]);

        // Switching to combined and back keeps both windows.
        dash.set_mode(&mut surface, ChartMode::Combined).unwrap();
        assert_eq!(surface.canvas(CHART_TARGET).unwrap().live().unwrap().spec().labels.len(), 4);
        dash.set_mode(&mut surface, ChartMode::Single).unwrap();
        assert_eq!(surface.canvas(CHART_TARGET).unwrap().live().unwrap().spec().labels.len(), 3);
    }

    #[test]
    fn mode_switch_redraws_from_last_data() {
        let mut dash = Dashboard::new(NoSource, DashboardOptions::default());
        let mut surface = Surface::with_dashboard_targets();
        let ticket = dash.begin_cycle();
        dash.apply(&mut surface, ticket, Ok(fetched()));

        dash.set_mode(&mut surface, ChartMode::Single).unwrap();
        let canvas = surface.canvas(CHART_TARGET).unwrap();
        assert_eq!(canvas.attached().len(), 1);
        assert_eq!(canvas.live().unwrap().spec().labels.len(), 4);
        assert_eq!(dash.mode(), ChartMode::Single);
    }

    #[tokio::test]
    async fn transport_failure_sets_a_notice() {
        let mut dash = Dashboard::new(NoSource, DashboardOptions::default());
        let mut surface = Surface::with_dashboard_targets();
        let outcome = dash.refresh(&mut surface).await;
        assert!(matches!(
            outcome,
            CycleOutcome::Failed(CycleError::Fetch(FetchError::Transport(_)))
        ));
        assert!(surface.notice().unwrap().message.contains("offline"));
    }
}
