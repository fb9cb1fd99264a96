//! Ratatui-based terminal dashboard.
//!
//! The screen is the surface: once a frame has laid out the stat cards, chart
//! and table regions, those regions are registered as display targets and the
//! readiness signal fires. A terminal too small for the layout registers
//! nothing and sends no signal; the first resize that makes the layout fit
//! does.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
};
use tokio::runtime::Runtime;

use crate::app::pipeline::{CycleOutcome, Dashboard, DashboardOptions};
use crate::data::AnySource;
use crate::domain::{Category, Value, dates};
use crate::error::AppError;
use crate::render::chart::Rgb;
use crate::render::summary::NO_DATA;
use crate::render::surface::{NoticeLevel, stat_target};
use crate::render::{CHART_TARGET, Palette, Surface, TABLE_TARGET, TableScope};

mod plotters_chart;

use plotters_chart::DashboardChart;

/// Smallest chart region the dashboard is laid out for.
const MIN_CHART: (u16, u16) = (30, 10);

/// Start the TUI.
pub fn run(runtime: &Runtime, source: AnySource, options: DashboardOptions) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(runtime, source, options);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App<'rt> {
    runtime: &'rt Runtime,
    dashboard: Dashboard<AnySource>,
    surface: Surface,
    palette: Palette,
    table_scope: TableScope,
    status: String,
    /// Set by `draw` when the layout changed enough to warrant a readiness signal.
    ready_signal: bool,
}

impl<'rt> App<'rt> {
    fn new(runtime: &'rt Runtime, source: AnySource, options: DashboardOptions) -> Self {
        let status = format!("source: {}", crate::data::SeriesSource::describe(&source));
        Self {
            runtime,
            palette: options.chart.palette.clone(),
            table_scope: options.table_scope,
            dashboard: Dashboard::new(source, options),
            surface: Surface::new(),
            status,
            ready_signal: false,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if std::mem::take(&mut self.ready_signal) {
                if let Some(outcome) = self.runtime.block_on(self.dashboard.on_ready(&mut self.surface)) {
                    self.report(outcome);
                }
                needs_redraw = true;
                continue;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('r') => {
                self.status = "Memuat data...".to_string();
                let outcome = self.runtime.block_on(self.dashboard.refresh(&mut self.surface));
                self.report(outcome);
            }
            KeyCode::Char('m') => {
                let mode = self.dashboard.mode().toggled();
                match self.dashboard.set_mode(&mut self.surface, mode) {
                    Ok(()) => self.status = format!("mode: {}", mode.display_name()),
                    Err(err) => self.status = err.to_string(),
                }
            }
            _ => {}
        }
        false
    }

    fn report(&mut self, outcome: CycleOutcome) {
        self.status = match outcome {
            CycleOutcome::Rendered(report) => format!(
                "{} hari historis, {} hari prediksi",
                report.historical_days, report.forecast_days
            ),
            // The notice slot carries the message.
            CycleOutcome::Failed(_) => String::new(),
            CycleOutcome::Stale => "respons lama diabaikan".to_string(),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let table_height = (self.surface.table(TABLE_TARGET).map_or(0, |rows| rows.len()) as u16 + 3).clamp(4, 12);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(table_height),
                Constraint::Length(3),
            ])
            .split(size);

        let fits = chunks[2].width >= MIN_CHART.0 && chunks[2].height >= MIN_CHART.1;
        if fits && !self.surface.contains(CHART_TARGET) {
            self.surface.register_dashboard_targets();
            self.ready_signal = true;
        }

        self.draw_header(frame, chunks[0]);
        self.draw_stats(frame, chunks[1]);
        self.draw_chart(frame, chunks[2]);
        self.draw_table(frame, chunks[3]);
        self.draw_footer(frame, chunks[4]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("vdash", Style::default().fg(Color::Cyan)),
            Span::raw(" - Prediksi Kebutuhan Ayam | "),
            Span::styled(
                format!("mode: {}", self.dashboard.mode().display_name()),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_stats(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(area);

        for (category, cell) in Category::ALL.into_iter().zip(cells.iter()) {
            let value = self
                .surface
                .text(stat_target(category))
                .filter(|t| !t.is_empty())
                .unwrap_or(NO_DATA);
            let color = color(self.palette.0[category].line);
            let p = Paragraph::new(Line::from(vec![
                Span::styled(value.to_string(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::raw(" kg/hari"),
            ]))
            .block(Block::default().title(category.display_name()).borders(Borders::ALL));
            frame.render_widget(p, *cell);
        }
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let live = self.surface.canvas(CHART_TARGET).and_then(|c| c.live());
        let title = live.map_or("Grafik", |chart| chart.spec().title.as_str());
        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(chart) = live else {
            let msg = Paragraph::new("Menunggu data...").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        frame.render_widget(DashboardChart { spec: chart.spec() }, inner);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let header = Row::new(vec!["Tanggal", "Potong", "Kampung", "Tua", "Total"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self
            .surface
            .table(TABLE_TARGET)
            .unwrap_or(&[])
            .iter()
            .map(|row| {
                let style = if row.predicted {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Row::new(vec![
                    dates::format_long(row.date),
                    fmt_value(row.values[Category::Potong]),
                    fmt_value(row.values[Category::Kampung]),
                    fmt_value(row.values[Category::Tua]),
                    fmt_value(row.total),
                ])
                .style(style)
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(18),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(9),
            ],
        )
        .header(header)
        .block(Block::default().title(table_title(self.table_scope)).borders(Borders::ALL));
        frame.render_widget(table, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "r refresh  m mode  q quit";
        let (message, style) = match self.surface.notice() {
            Some(notice) if notice.level == NoticeLevel::Error => {
                (notice.message.as_str(), Style::default().fg(Color::Red))
            }
            Some(notice) => (notice.message.as_str(), Style::default().fg(Color::Yellow)),
            None => (self.status.as_str(), Style::default().fg(Color::Yellow)),
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(message, style),
        ]);
        let p = Paragraph::new(Text::from(line)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn color(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

fn fmt_value(v: Value) -> String {
    v.map(|x| format!("{x:.1}")).unwrap_or_else(|| NO_DATA.to_string())
}

fn table_title(scope: TableScope) -> &'static str {
    match scope {
        TableScope::Forecast => "Prediksi",
        TableScope::Merged => "Historis + Prediksi",
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::data::DemoSource;

    fn runtime() -> Runtime {
        tokio::runtime::Builder::new_current_thread().build().unwrap()
    }

    fn app(runtime: &Runtime, table_scope: TableScope) -> App<'_> {
        let source = AnySource::Demo(DemoSource::new(1, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(), 10));
        let options = DashboardOptions {
            table_scope,
            ..DashboardOptions::default()
        };
        App::new(runtime, source, options)
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn readiness_fires_only_once_the_layout_fits() {
        let runtime = runtime();
        let mut app = app(&runtime, TableScope::Forecast);
        assert!(!app.ready_signal);

        let mut small = Terminal::new(TestBackend::new(20, 8)).unwrap();
        small.draw(|f| app.draw(f)).unwrap();
        assert!(!app.ready_signal);
        assert!(!app.surface.contains(CHART_TARGET));

        let mut large = Terminal::new(TestBackend::new(100, 40)).unwrap();
        large.draw(|f| app.draw(f)).unwrap();
        assert!(app.ready_signal);
        assert!(app.surface.contains(CHART_TARGET));

        // Later frames do not raise the signal again.
        app.ready_signal = false;
        large.draw(|f| app.draw(f)).unwrap();
        assert!(!app.ready_signal);
    }

    #[test]
    fn table_title_follows_the_scope() {
        let runtime = runtime();
        for (scope, merged_title) in [(TableScope::Forecast, false), (TableScope::Merged, true)] {
            let mut app = app(&runtime, scope);
            let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
            terminal.draw(|f| app.draw(f)).unwrap();
            assert_eq!(screen(&terminal).contains("Historis + Prediksi"), merged_title, "{scope:?}");
        }
    }
}
