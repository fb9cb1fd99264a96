//! SeriesAligner: put history and forecast on one gap-padded date axis.
//!
//! For each category the output carries two equally long columns:
//!
//! ```text
//! observed : h0 h1 h2 .  .
//! predicted: .  .  .  f0 f1
//! ```
//!
//! so a chart can draw a solid line that stops at the last observed day and a
//! dashed line that starts on the first forecast day.

use crate::domain::{Category, MergedSeries, PerCategory, Series, Value};

/// Merge `historical` and `forecast`.
///
/// Precondition (not re-checked): every historical date precedes the first
/// forecast date. Either input may be empty.
pub fn merge(historical: &Series, forecast: &Series) -> MergedSeries {
    let h = historical.len();
    let f = forecast.len();

    let dates = historical.dates().chain(forecast.dates()).collect();

    let observed = PerCategory::from_fn(|category| padded(historical, category, 0, f));
    let predicted = PerCategory::from_fn(|category| padded(forecast, category, h, 0));

    MergedSeries::from_parts(dates, h, observed, predicted)
}

fn padded(series: &Series, category: Category, before: usize, after: usize) -> Vec<Value> {
    let mut column = Vec::with_capacity(before + series.len() + after);
    column.resize(before, None);
    column.extend(series.column(category));
    column.resize(before + series.len() + after, None);
    column
}
