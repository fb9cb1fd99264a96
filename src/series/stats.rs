//! StatsAggregator: per-category figures over a series.
//!
//! Results are recomputed from scratch on every call; nothing is cached.

use crate::domain::{Category, CategorySummary, PerCategory, Series, SeriesDescription, SummaryStats};

/// Mean per category over the days that have a value.
///
/// A category without any value yields `None` ("no data") instead of failing.
pub fn summarize(series: &Series) -> SummaryStats {
    SummaryStats {
        means: PerCategory::from_fn(|category| mean(present(series, category))),
    }
}

/// Total, average, max and min per category (the `/api/stats` figures).
pub fn describe(series: &Series) -> SeriesDescription {
    SeriesDescription {
        days: series.len(),
        categories: PerCategory::from_fn(|category| {
            let values: Vec<f64> = present(series, category).collect();
            let average = mean(values.iter().copied())?;
            Some(CategorySummary {
                total: values.iter().sum(),
                average,
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
            })
        }),
    }
}

fn present(series: &Series, category: Category) -> impl Iterator<Item = f64> + '_ {
    series.observations().iter().filter_map(move |o| o.values[category])
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}
