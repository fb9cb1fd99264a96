//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline and renderers stay free of presentation details
//! - output changes are localized (the tests below pin the layout)

use crate::domain::{Category, CategorySummary, PerCategory, Series, Value, dates};
use crate::error::FetchError;
use crate::plot::render_ascii_chart;
use crate::render::summary::{NO_DATA, format_mean};
use crate::render::surface::stat_target;
use crate::render::{CHART_TARGET, Surface, TABLE_TARGET, TableRow};
use crate::report::CheckReport;
use crate::series::summarize;

/// Everything on a dashboard surface as text: stat cards, chart, table.
pub fn format_dashboard(surface: &Surface, chart_width: usize, chart_height: usize) -> String {
    let mut out = String::new();

    out.push_str("=== vdash - Prediksi Kebutuhan Ayam ===\n");
    out.push_str("Rata-rata prediksi (kg/hari):\n");
    for category in Category::ALL {
        let value = surface
            .text(stat_target(category))
            .filter(|t| !t.is_empty())
            .unwrap_or(NO_DATA);
        out.push_str(&format!("  {:<14}{value}\n", category.display_name()));
    }
    out.push('\n');

    match surface.canvas(CHART_TARGET).and_then(|c| c.live()) {
        Some(chart) => out.push_str(&render_ascii_chart(chart.spec(), chart_width, chart_height)),
        None => out.push_str("(belum ada grafik)\n"),
    }
    out.push('\n');

    out.push_str(&format_table(surface.table(TABLE_TARGET).unwrap_or(&[])));
    out
}

/// Table body as fixed-width text. Forecast rows are marked with `*`.
pub fn format_table(rows: &[TableRow]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<18} {:>8} {:>8} {:>8} {:>8}",
            "Tanggal",
            Category::Potong.short_name(),
            Category::Kampung.short_name(),
            Category::Tua.short_name(),
            "total"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&format!("{:-<18} {:-<8} {:-<8} {:-<8} {:-<8}\n", "", "", "", "", ""));

    if rows.is_empty() {
        out.push_str("(tidak ada data)\n");
        return out;
    }

    for row in rows {
        let marker = if row.predicted { " *" } else { "" };
        out.push_str(&format!(
            "{:<18} {:>8} {:>8} {:>8} {:>8}{marker}\n",
            dates::format_long(row.date),
            fmt_value(row.values[Category::Potong]),
            fmt_value(row.values[Category::Kampung]),
            fmt_value(row.values[Category::Tua]),
            fmt_value(row.total),
        ));
    }
    out
}

/// The `check` report: one block per endpoint.
pub fn format_check(report: &CheckReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== vdash check: {} ===\n", report.source));

    series_block(&mut out, "/api/historical", &report.historical);
    series_block(&mut out, "/api/predictions", &report.forecast);

    match &report.server_stats {
        Ok(stats) => {
            out.push_str("[OK]   /api/stats\n");
            out.push_str(&format_server_stats(stats));
        }
        Err(err) => out.push_str(&fail_line("/api/stats", err)),
    }

    out.push_str(if report.passed() { "\nsemua endpoint OK\n" } else { "\nada endpoint yang gagal\n" });
    out
}

fn series_block(out: &mut String, path: &str, result: &Result<Series, FetchError>) {
    let series = match result {
        Ok(series) => series,
        Err(err) => {
            out.push_str(&fail_line(path, err));
            return;
        }
    };

    let range = match (series.first_date(), series.last_date()) {
        (Some(first), Some(last)) => format!(" ({} - {})", dates::format_long(first), dates::format_long(last)),
        _ => String::new(),
    };
    out.push_str(&format!("[OK]   {path}  {} hari{range}\n", series.len()));

    let stats = summarize(series);
    let means: Vec<String> = Category::ALL
        .iter()
        .map(|&c| format!("{} {}", c.display_name(), format_mean(stats.mean(c))))
        .collect();
    out.push_str(&format!("       rata-rata: {}\n", means.join(" | ")));
}

fn format_server_stats(stats: &PerCategory<Option<CategorySummary>>) -> String {
    let mut out = String::new();
    for (category, summary) in stats.iter() {
        match summary {
            Some(s) => out.push_str(&format!(
                "       {}: total {:.1}, rata-rata {:.1}, maks {:.1}, min {:.1}\n",
                category.display_name(),
                s.total,
                s.average,
                s.max,
                s.min
            )),
            None => out.push_str(&format!("       {}: {NO_DATA}\n", category.display_name())),
        }
    }
    out
}

fn fail_line(path: &str, err: &FetchError) -> String {
    format!("[FAIL] {path}  {err}\n")
}

fn fmt_value(v: Value) -> String {
    v.map(|x| format!("{x:.1}")).unwrap_or_else(|| NO_DATA.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{DailyObservation, SeriesKind};

    fn row(day: u32, values: [Value; 3], predicted: bool) -> TableRow {
        let values = PerCategory::from_fn(|c| values[c.index()]);
        let obs = DailyObservation::new(NaiveDate::from_ymd_opt(2025, 1, day).unwrap(), values);
        TableRow {
            date: obs.date,
            values: obs.values,
            total: obs.total(),
            predicted,
        }
    }

    #[test]
    fn table_layout_is_stable() {
        let txt = format_table(&[
            row(2, [Some(10.0), Some(5.0), Some(2.0)], false),
            row(3, [Some(13.0), None, Some(3.0)], true),
        ]);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Tanggal              potong  kampung      tua    total");
        assert_eq!(lines[2], "2 Januari 2025         10.0      5.0      2.0     17.0");
        assert_eq!(lines[3], "3 Januari 2025         13.0        -      3.0     16.0 *");
    }

    #[test]
    fn empty_table_says_so() {
        assert!(format_table(&[]).ends_with("(tidak ada data)\n"));
    }

    #[test]
    fn dashboard_without_data_shows_placeholders() {
        let surface = Surface::with_dashboard_targets();
        let txt = format_dashboard(&surface, 40, 8);
        assert!(txt.contains("  Ayam Potong   -\n"));
        assert!(txt.contains("(belum ada grafik)"));
        assert!(txt.contains("(tidak ada data)"));
    }

    #[test]
    fn check_report_marks_failures() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let historical = Series::new(
            SeriesKind::Historical,
            vec![DailyObservation::new(date, PerCategory::from_fn(|_| Some(4.0)))],
        )
        .unwrap();
        let report = CheckReport {
            source: "demo".to_string(),
            historical: Ok(historical),
            forecast: Err(FetchError::Application("model unavailable".to_string())),
            server_stats: Ok(PerCategory::default()),
        };

        let txt = format_check(&report);
        assert!(txt.contains("[OK]   /api/historical  1 hari (1 Januari 2025 - 1 Januari 2025)"));
        assert!(txt.contains("rata-rata: Ayam Potong 4.0 | Ayam Kampung 4.0 | Ayam Tua 4.0"));
        assert!(txt.contains("[FAIL] /api/predictions  model unavailable"));
        assert!(txt.contains("       Ayam Tua: -"));
        assert!(txt.ends_with("ada endpoint yang gagal\n"));
    }
}
