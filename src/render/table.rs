//! TableRenderer: one row per date, one column per category, plus a row total.
//!
//! Every call rebuilds the whole row set and swaps it in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DailyObservation, MergedSeries, PerCategory, Series, Value};
use crate::error::RenderError;
use crate::render::surface::Surface;

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub date: NaiveDate,
    pub values: PerCategory<Value>,
    pub total: Value,
    /// Row comes from the forecast.
    pub predicted: bool,
}

/// Which rows the table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TableScope {
    /// Forecast days only.
    Forecast,
    /// Historical window followed by the forecast.
    Merged,
}

pub fn rows_from_series(series: &Series, predicted: bool) -> Vec<TableRow> {
    series
        .observations()
        .iter()
        .map(|o| row(o, predicted))
        .collect()
}

/// Rows of a merged series: the observed side before the boundary, the predicted side after.
pub fn rows_from_merged(merged: &MergedSeries) -> Vec<TableRow> {
    merged
        .entries()
        .enumerate()
        .map(|(i, entry)| {
            let predicted = i >= merged.boundary();
            let values = if predicted { entry.predicted } else { entry.observed };
            row(&DailyObservation::new(entry.date, values), predicted)
        })
        .collect()
}

fn row(observation: &DailyObservation, predicted: bool) -> TableRow {
    TableRow {
        date: observation.date,
        values: observation.values,
        total: observation.total(),
        predicted,
    }
}

#[derive(Debug, Clone)]
pub struct TableRenderer {
    target: String,
}

impl TableRenderer {
    pub fn new(target: impl Into<String>) -> Self {
        Self { target: target.into() }
    }

    /// Replace the table body with `rows`.
    pub fn render(&self, surface: &mut Surface, rows: Vec<TableRow>) -> Result<usize, RenderError> {
        let body = surface
            .table_mut(&self.target)
            .ok_or_else(|| RenderError::TargetMissing(self.target.clone()))?;
        *body = rows;
        Ok(body.len())
    }

    pub fn render_series(&self, surface: &mut Surface, series: &Series) -> Result<usize, RenderError> {
        let predicted = series.kind() == crate::domain::SeriesKind::Forecast;
        self.render(surface, rows_from_series(series, predicted))
    }

    pub fn render_merged(&self, surface: &mut Surface, merged: &MergedSeries) -> Result<usize, RenderError> {
        self.render(surface, rows_from_merged(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, SeriesKind};
    use crate::render::surface::{TABLE_TARGET, TargetKind};
    use crate::series::merge;

    fn series(kind: SeriesKind, first_day: u32, rows: &[[f64; 3]]) -> Series {
        let obs = rows
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let date = NaiveDate::from_ymd_opt(2025, 1, first_day + i as u32).unwrap();
                DailyObservation::new(date, PerCategory::from_fn(|c| Some(r[c.index()])))
            })
            .collect();
        Series::new(kind, obs).unwrap()
    }

    fn surface() -> Surface {
        let mut s = Surface::new();
        s.register(TABLE_TARGET, TargetKind::TableBody);
        s
    }

    #[test]
    fn rerender_replaces_rows() {
        let mut s = surface();
        let table = TableRenderer::new(TABLE_TARGET);
        let f = series(SeriesKind::Forecast, 2, &[[13.0, 6.0, 3.0], [14.0, 7.0, 3.0]]);

        assert_eq!(table.render_series(&mut s, &f).unwrap(), 2);
        assert_eq!(table.render_series(&mut s, &f).unwrap(), 2);
        let rows = s.table(TABLE_TARGET).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].total, Some(22.0));
        assert!(rows.iter().all(|r| r.predicted));
    }

    #[test]
    fn merged_rows_switch_sides_at_the_boundary() {
        let h = series(SeriesKind::Historical, 1, &[[10.0, 5.0, 2.0]]);
        let f = series(SeriesKind::Forecast, 2, &[[13.0, 6.0, 3.0]]);
        let rows = rows_from_merged(&merge(&h, &f));
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].predicted);
        assert_eq!(rows[0].values[Category::Potong], Some(10.0));
        assert!(rows[1].predicted);
        assert_eq!(rows[1].values[Category::Potong], Some(13.0));
    }

    #[test]
    fn missing_table_target_is_reported() {
        let mut s = Surface::new();
        let table = TableRenderer::new(TABLE_TARGET);
        assert!(table.render(&mut s, Vec::new()).is_err());
    }
}
