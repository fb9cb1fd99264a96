//! Plotters-powered dashboard chart widget for Ratatui.
//!
//! Draws the live chart instance of the canvas target: one solid line per
//! observed dataset, one dashed line per predicted dataset, translucent fills
//! where the trace style asks for them.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::{Value, dates};
use crate::render::chart::{ChartSpec, Rgb};

/// Dash length in x units (one unit = one day).
const DASH: f64 = 0.25;

/// X bounds (day index) and y bounds (kg) for `spec`, padded for readability.
pub fn chart_bounds(spec: &ChartSpec) -> ([f64; 2], [f64; 2]) {
    let n = spec.labels.len();
    let x_bounds = if n < 2 { [-0.5, 0.5] } else { [0.0, (n - 1) as f64] };
    let y_max = match spec.max_value() {
        m if m > 0.0 => m * 1.05,
        _ => 1.0,
    };
    (x_bounds, [0.0, y_max])
}

/// Runs of consecutive present values; an absent value breaks the line.
fn runs(values: &[Value]) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (i, v) in values.iter().enumerate() {
        match v {
            Some(y) => current.push((i as f64, *y)),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Split a polyline into the "on" pieces of a dash pattern.
fn dashes(run: &[(f64, f64)]) -> Vec<[(f64, f64); 2]> {
    let mut out = Vec::new();
    for pair in run.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        let steps = (((x1 - x0) / DASH).round() as usize).max(1);
        for k in (0..steps).step_by(2) {
            let t0 = k as f64 / steps as f64;
            let t1 = ((k + 1) as f64 / steps as f64).min(1.0);
            out.push([
                (x0 + (x1 - x0) * t0, y0 + (y1 - y0) * t0),
                (x0 + (x1 - x0) * t1, y0 + (y1 - y0) * t1),
            ]);
        }
    }
    out
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

pub struct DashboardChart<'a> {
    pub spec: &'a ChartSpec,
}

impl<'a> Widget for DashboardChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let ([x0, x1], [y0, y1]) = chart_bounds(self.spec);
        let spec = self.spec;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(spec.x_label)
                .y_desc(spec.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| {
                    let i = v.round();
                    if i < 0.0 {
                        return String::new();
                    }
                    spec.labels
                        .get(i as usize)
                        .map(|d| dates::format_short(*d))
                        .unwrap_or_default()
                })
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // Fills first so every line stays visible on top.
            for dataset in &spec.datasets {
                let Some(alpha) = dataset.style.fill_alpha else {
                    continue;
                };
                let c = dataset.style.color;
                for run in runs(&dataset.values) {
                    chart.draw_series(AreaSeries::new(run, 0.0, RGBAColor(c.0, c.1, c.2, alpha)))?;
                }
            }

            for dataset in &spec.datasets {
                let line = ShapeStyle::from(&rgb(dataset.style.color))
                    .stroke_width(dataset.style.line_width.round() as u32);
                for run in runs(&dataset.values) {
                    if dataset.style.dashed {
                        chart.draw_series(
                            dashes(&run)
                                .into_iter()
                                .map(|[a, b]| PathElement::new(vec![a, b], line)),
                        )?;
                    } else {
                        chart.draw_series(LineSeries::new(run.iter().copied(), line))?;
                    }

                    // We avoid `Circle` markers: the backend maps circle radii
                    // incorrectly and produces huge circles. Pixels in the
                    // darker border colour mark the data points instead.
                    let marker = rgb(dataset.style.point_border);
                    chart.draw_series(run.iter().map(|&p| Pixel::new(p, marker)))?;
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
