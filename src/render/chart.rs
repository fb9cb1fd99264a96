//! ChartRenderer and the chart description it produces.
//!
//! A `ChartInstance` is a render-only, data-driven description: labels,
//! datasets and per-dataset trace styles. Front-ends (Plotters in the TUI,
//! ASCII for `show`) draw whatever instance is live on the chart canvas.
//!
//! Visual encoding:
//! - each category owns one color, shared by its observed and predicted trace
//! - observed traces are solid with small markers
//! - predicted traces are dashed, with larger markers and a filled area

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Category, ChartMode, MergedSeries, PerCategory, Value};
use crate::error::RenderError;
use crate::render::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Line and marker colors of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryColors {
    pub line: Rgb,
    pub point_border: Rgb,
}

/// Color per category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette(pub PerCategory<CategoryColors>);

impl Default for Palette {
    fn default() -> Self {
        Palette(PerCategory::from_fn(|category| match category {
            Category::Potong => CategoryColors {
                line: Rgb(0x60, 0xa5, 0xfa),
                point_border: Rgb(0x1e, 0x40, 0xaf),
            },
            Category::Kampung => CategoryColors {
                line: Rgb(0x34, 0xd3, 0x99),
                point_border: Rgb(0x04, 0x78, 0x57),
            },
            Category::Tua => CategoryColors {
                line: Rgb(0xfb, 0xbf, 0x24),
                point_border: Rgb(0xb4, 0x53, 0x09),
            },
        }))
    }
}

/// Visual configuration of the dashboard chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub mode: ChartMode,
    pub palette: Palette,
    /// Days shown by the single-series chart.
    pub recent_days: usize,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            mode: ChartMode::Combined,
            palette: Palette::default(),
            recent_days: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trace {
    Observed,
    Predicted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceStyle {
    pub color: Rgb,
    pub point_border: Rgb,
    pub dashed: bool,
    /// Area fill opacity; `None` means no fill.
    pub fill_alpha: Option<f64>,
    pub line_width: f64,
    pub point_radius: u32,
}

impl TraceStyle {
    /// Observed trace in the single-series chart.
    pub fn observed_single(colors: CategoryColors) -> Self {
        Self {
            color: colors.line,
            point_border: colors.point_border,
            dashed: false,
            fill_alpha: Some(0.1),
            line_width: 2.5,
            point_radius: 4,
        }
    }

    /// Observed trace in the combined chart.
    pub fn observed(colors: CategoryColors) -> Self {
        Self {
            color: colors.line,
            point_border: colors.point_border,
            dashed: false,
            fill_alpha: None,
            line_width: 2.0,
            point_radius: 2,
        }
    }

    pub fn predicted(colors: CategoryColors) -> Self {
        Self {
            color: colors.line,
            point_border: colors.point_border,
            dashed: true,
            fill_alpha: Some(0.2),
            line_width: 2.5,
            point_radius: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub category: Category,
    pub trace: Trace,
    /// One slot per label; `None` leaves a gap.
    pub values: Vec<Value>,
    pub style: TraceStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub labels: Vec<NaiveDate>,
    pub datasets: Vec<Dataset>,
    pub x_label: &'static str,
    pub y_label: &'static str,
}

impl ChartSpec {
    /// Observed values only, restricted to the most recent `style.recent_days`.
    pub fn single(merged: &MergedSeries, style: &ChartStyle) -> Self {
        let end = merged.boundary();
        let start = end.saturating_sub(style.recent_days);
        let datasets = Category::ALL
            .iter()
            .map(|&category| Dataset {
                label: category.display_name().to_string(),
                category,
                trace: Trace::Observed,
                values: merged.observed(category)[start..end].to_vec(),
                style: TraceStyle::observed_single(style.palette.0[category]),
            })
            .collect();

        Self {
            title: format!("Data Historis - {} Hari Terakhir", end - start),
            labels: merged.dates()[start..end].to_vec(),
            datasets,
            x_label: "Tanggal",
            y_label: "Jumlah (kg)",
        }
    }

    /// Historical window (solid) followed by the forecast (dashed).
    pub fn combined(merged: &MergedSeries, style: &ChartStyle) -> Self {
        let mut datasets = Vec::with_capacity(Category::COUNT * 2);
        for category in Category::ALL {
            datasets.push(Dataset {
                label: format!("{} (Historis)", category.display_name()),
                category,
                trace: Trace::Observed,
                values: merged.observed(category).to_vec(),
                style: TraceStyle::observed(style.palette.0[category]),
            });
        }
        for category in Category::ALL {
            datasets.push(Dataset {
                label: format!("{} (Prediksi)", category.display_name()),
                category,
                trace: Trace::Predicted,
                values: merged.predicted(category).to_vec(),
                style: TraceStyle::predicted(style.palette.0[category]),
            });
        }

        Self {
            title: format!(
                "Historis ({} hari) vs Prediksi ({} hari)",
                merged.boundary(),
                merged.len() - merged.boundary()
            ),
            labels: merged.dates().to_vec(),
            datasets,
            x_label: "Tanggal",
            y_label: "Jumlah (kg)",
        }
    }

    pub fn for_mode(merged: &MergedSeries, style: &ChartStyle) -> Self {
        match style.mode {
            ChartMode::Single => Self::single(merged, style),
            ChartMode::Combined => Self::combined(merged, style),
        }
    }

    /// Largest value over all datasets (0 when there is none).
    pub fn max_value(&self) -> f64 {
        self.datasets
            .iter()
            .flat_map(|d| d.values.iter().flatten())
            .copied()
            .fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartId(u64);

/// A chart bound to a canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartInstance {
    id: ChartId,
    spec: ChartSpec,
}

impl ChartInstance {
    pub fn id(&self) -> ChartId {
        self.id
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }
}

/// Owns the one chart instance bound to its canvas target.
#[derive(Debug)]
pub struct ChartRenderer {
    target: String,
    style: ChartStyle,
    live: Option<ChartId>,
    next_id: u64,
}

impl ChartRenderer {
    pub fn new(target: impl Into<String>, style: ChartStyle) -> Self {
        Self {
            target: target.into(),
            style,
            live: None,
            next_id: 0,
        }
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn set_mode(&mut self, mode: ChartMode) {
        self.style.mode = mode;
    }

    pub fn live(&self) -> Option<ChartId> {
        self.live
    }

    /// Replace the chart on the target with one built from `merged`.
    ///
    /// The new instance is fully built before the old one is disposed, so a
    /// missing target leaves the previous chart in place.
    pub fn render(&mut self, surface: &mut Surface, merged: &MergedSeries) -> Result<ChartId, RenderError> {
        let spec = ChartSpec::for_mode(merged, &self.style);

        let canvas = surface
            .canvas_mut(&self.target)
            .ok_or_else(|| RenderError::TargetMissing(self.target.clone()))?;

        let id = ChartId(self.next_id);
        self.next_id += 1;

        if let Some(old) = self.live.take() {
            debug!(target_id = %self.target, old = old.0, "disposing chart");
            canvas.detach(old);
        }
        canvas.attach(ChartInstance { id, spec });
        self.live = Some(id);

        debug!(target_id = %self.target, id = id.0, mode = self.style.mode.display_name(), "chart rendered");
        Ok(id)
    }

    /// Remove the live chart, if any.
    pub fn dispose(&mut self, surface: &mut Surface) {
        if let Some(old) = self.live.take() {
            if let Some(canvas) = surface.canvas_mut(&self.target) {
                canvas.detach(old);
            }
        }
    }
}
