//! ASCII plotting of a chart instance for plain terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks without the TUI
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed markers: category initial in lowercase (`p`, `k`, `t`), solid `-` line
//! - predicted markers: category initial in uppercase (`P`, `K`, `T`), dashed `- -` line

use crate::domain::{Category, dates};
use crate::render::chart::{ChartSpec, Trace};

/// Render `spec` into a `width` x `height` character grid with a header, x labels and legend.
pub fn render_ascii_chart(spec: &ChartSpec, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let y_max = match spec.max_value() {
        m if m > 0.0 => m * 1.05,
        _ => 1.0,
    };

    let mut out = String::new();
    out.push_str(&format!("{} | y=[0.0, {y_max:.1}] kg\n", spec.title));

    let n = spec.labels.len();
    if n == 0 {
        out.push_str("(no data)\n");
        return out;
    }

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so markers overlay them.
    for dataset in &spec.datasets {
        let mut prev: Option<(usize, usize)> = None;
        for (i, value) in dataset.values.iter().enumerate() {
            let Some(v) = value else {
                prev = None;
                continue;
            };
            let cell = (map_x(i, n, width), map_y(*v, y_max, height));
            if let Some((x0, y0)) = prev {
                draw_line(&mut grid, x0, y0, cell.0, cell.1, dataset.style.dashed);
            }
            prev = Some(cell);
        }
    }

    for dataset in &spec.datasets {
        let ch = glyph(dataset.category, dataset.trace);
        for (i, value) in dataset.values.iter().enumerate() {
            if let Some(v) = value {
                grid[map_y(*v, y_max, height)][map_x(i, n, width)] = ch;
            }
        }
    }

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    let first = dates::format_short(spec.labels[0]);
    let last = dates::format_short(spec.labels[n - 1]);
    if n == 1 {
        out.push_str(&first);
    } else {
        let pad = width.saturating_sub(first.len() + last.len()).max(1);
        out.push_str(&format!("{first}{}{last}", " ".repeat(pad)));
    }
    out.push('\n');

    let legend: Vec<String> = Category::ALL
        .iter()
        .map(|&c| {
            format!(
                "{}/{} {}",
                glyph(c, Trace::Observed),
                glyph(c, Trace::Predicted),
                c.display_name()
            )
        })
        .collect();
    out.push_str(&format!("{} (lowercase: observed, UPPERCASE: predicted)\n", legend.join("  ")));

    out
}

fn glyph(category: Category, trace: Trace) -> char {
    let ch = match category {
        Category::Potong => 'p',
        Category::Kampung => 'k',
        Category::Tua => 't',
    };
    match trace {
        Trace::Observed => ch,
        Trace::Predicted => ch.to_ascii_uppercase(),
    }
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n < 2 {
        return 0;
    }
    ((i as f64 / (n as f64 - 1.0)) * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = (y / y_max).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Dashed lines skip every other cell.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, dashed: bool) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut step = 0usize;

    loop {
        let visible = !dashed || step % 2 == 0;
        if visible
            && y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = '-';
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
        step += 1;
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{DailyObservation, MergedSeries, PerCategory, Series, SeriesKind};
    use crate::render::chart::ChartStyle;
    use crate::series::merge;

    fn potong_only(kind: SeriesKind, first_day: u32, values: &[f64]) -> Series {
        let obs = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let mut values = PerCategory::default();
                values[Category::Potong] = Some(v);
                DailyObservation::new(NaiveDate::from_ymd_opt(2025, 1, first_day + i as u32).unwrap(), values)
            })
            .collect();
        Series::new(kind, obs).unwrap()
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let merged = merge(
            &potong_only(SeriesKind::Historical, 1, &[0.0, 10.0]),
            &potong_only(SeriesKind::Forecast, 3, &[10.0]),
        );
        let spec = ChartSpec::combined(&merged, &ChartStyle::default());

        let txt = render_ascii_chart(&spec, 10, 5);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Historis (2 hari) vs Prediksi (1 hari) | y=[0.0, 10.5] kg");
        assert_eq!(
            &lines[1..6],
            &["     p   P", "    -", "  --", " -", "p"]
        );
        assert_eq!(lines[6], "1 Jan 3 Jan");
        assert!(lines[7].starts_with("p/P Ayam Potong"));
    }

    #[test]
    fn dashed_lines_leave_gaps() {
        let merged = merge(
            &Series::empty(SeriesKind::Historical),
            &potong_only(SeriesKind::Forecast, 1, &[5.0, 5.0]),
        );
        let spec = ChartSpec::combined(&merged, &ChartStyle::default());
        let txt = render_ascii_chart(&spec, 10, 5);
        // Both points sit on the top grid row, right below the header.
        assert_eq!(txt.lines().nth(1), Some("P - - - -P"));
    }

    #[test]
    fn empty_chart_says_so() {
        let spec = ChartSpec::combined(&MergedSeries::default(), &ChartStyle::default());
        assert!(render_ascii_chart(&spec, 20, 5).ends_with("(no data)\n"));
    }
}
