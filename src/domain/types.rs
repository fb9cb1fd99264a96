//! Shared domain types.
//!
//! These types are plain immutable values handed from one pipeline stage to
//! the next:
//!
//! - `Series` (observed history or model forecast) comes out of the fetcher
//! - `MergedSeries` comes out of the aligner and feeds the combined chart
//! - `SummaryStats` / `SeriesDescription` come out of the aggregator

use std::ops::{Index, IndexMut};

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commodity class tracked per day.
///
/// Declaration order is the display order: it fixes legend order, chart
/// colors and table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "ayam_potong")]
    Potong,
    #[serde(rename = "ayam_kampung")]
    Kampung,
    #[serde(rename = "ayam_tua")]
    Tua,
}

impl Category {
    pub const COUNT: usize = 3;
    pub const ALL: [Category; Category::COUNT] = [Category::Potong, Category::Kampung, Category::Tua];

    pub fn index(self) -> usize {
        match self {
            Category::Potong => 0,
            Category::Kampung => 1,
            Category::Tua => 2,
        }
    }

    /// Key used in endpoint payloads.
    pub fn key(self) -> &'static str {
        match self {
            Category::Potong => "ayam_potong",
            Category::Kampung => "ayam_kampung",
            Category::Tua => "ayam_tua",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Potong => "Ayam Potong",
            Category::Kampung => "Ayam Kampung",
            Category::Tua => "Ayam Tua",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Category::Potong => "potong",
            Category::Kampung => "kampung",
            Category::Tua => "tua",
        }
    }
}

/// One value per category, indexed by `Category`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerCategory<T>([T; Category::COUNT]);

impl<T> PerCategory<T> {
    pub fn from_fn(f: impl FnMut(Category) -> T) -> Self {
        Self(Category::ALL.map(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.into_iter().zip(self.0.iter())
    }

    pub fn map<U>(&self, mut f: impl FnMut(Category, &T) -> U) -> PerCategory<U> {
        PerCategory::from_fn(|c| f(c, &self.0[c.index()]))
    }

    pub fn values(&self) -> &[T] {
        &self.0
    }
}

impl<T> Index<Category> for PerCategory<T> {
    type Output = T;

    fn index(&self, category: Category) -> &T {
        &self.0[category.index()]
    }
}

impl<T> IndexMut<Category> for PerCategory<T> {
    fn index_mut(&mut self, category: Category) -> &mut T {
        &mut self.0[category.index()]
    }
}

/// A single day's quantity. `None` is the "no value" marker, distinct from `0.0`.
pub type Value = Option<f64>;

/// Calendar day plus one value per category.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyObservation {
    pub date: NaiveDate,
    pub values: PerCategory<Value>,
}

impl DailyObservation {
    pub fn new(date: NaiveDate, values: PerCategory<Value>) -> Self {
        Self { date, values }
    }

    /// Sum across categories, ignoring missing values. `None` when every category is missing.
    pub fn total(&self) -> Value {
        let mut present = self.values.values().iter().flatten().peekable();
        present.peek()?;
        Some(present.sum())
    }
}

/// Which endpoint a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Historical,
    Forecast,
}

impl SeriesKind {
    pub fn display_name(self) -> &'static str {
        match self {
            SeriesKind::Historical => "historical",
            SeriesKind::Forecast => "forecast",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("dates must be strictly increasing: {prev} is followed by {next} at index {index}")]
    OutOfOrder {
        index: usize,
        prev: NaiveDate,
        next: NaiveDate,
    },
}

/// Date-ordered daily observations without duplicate dates.
///
/// Gaps are allowed (the shop closes on some days and the forecast skips them).
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    kind: SeriesKind,
    observations: Vec<DailyObservation>,
}

impl Series {
    pub fn new(kind: SeriesKind, observations: Vec<DailyObservation>) -> Result<Self, SeriesError> {
        for (index, pair) in observations.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::OutOfOrder {
                    index: index + 1,
                    prev: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self { kind, observations })
    }

    pub fn empty(kind: SeriesKind) -> Self {
        Self {
            kind,
            observations: Vec::new(),
        }
    }

    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[DailyObservation] {
        &self.observations
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.observations.iter().map(|o| o.date)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    /// Values of one category in date order.
    pub fn column(&self, category: Category) -> Vec<Value> {
        self.observations.iter().map(|o| o.values[category]).collect()
    }

    /// The most recent `days` observations (the whole series when shorter).
    pub fn last_days(&self, days: usize) -> Series {
        let start = self.observations.len().saturating_sub(days);
        Series {
            kind: self.kind,
            observations: self.observations[start..].to_vec(),
        }
    }
}

/// Per-day entry of a merged series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergedEntry {
    pub date: NaiveDate,
    pub observed: PerCategory<Value>,
    pub predicted: PerCategory<Value>,
}

/// Historical window followed by the forecast on one date axis.
///
/// Every category has two parallel columns of equal length. Entries before
/// `boundary()` only carry `observed` values, entries from `boundary()` on
/// only carry `predicted` values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedSeries {
    dates: Vec<NaiveDate>,
    boundary: usize,
    observed: PerCategory<Vec<Value>>,
    predicted: PerCategory<Vec<Value>>,
}

impl MergedSeries {
    pub(crate) fn from_parts(
        dates: Vec<NaiveDate>,
        boundary: usize,
        observed: PerCategory<Vec<Value>>,
        predicted: PerCategory<Vec<Value>>,
    ) -> Self {
        debug_assert!(boundary <= dates.len());
        debug_assert!(observed.values().iter().all(|c| c.len() == dates.len()));
        debug_assert!(predicted.values().iter().all(|c| c.len() == dates.len()));
        Self {
            dates,
            boundary,
            observed,
            predicted,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of leading historical entries.
    pub fn boundary(&self) -> usize {
        self.boundary
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn observed(&self, category: Category) -> &[Value] {
        &self.observed[category]
    }

    pub fn predicted(&self, category: Category) -> &[Value] {
        &self.predicted[category]
    }

    pub fn entry(&self, index: usize) -> Option<MergedEntry> {
        let date = *self.dates.get(index)?;
        Some(MergedEntry {
            date,
            observed: self.observed.map(|_, col| col[index]),
            predicted: self.predicted.map(|_, col| col[index]),
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = MergedEntry> + '_ {
        (0..self.len()).filter_map(|i| self.entry(i))
    }
}

/// Mean per category. `None` means the category had no values ("no data").
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SummaryStats {
    pub means: PerCategory<Option<f64>>,
}

impl SummaryStats {
    pub fn mean(&self, category: Category) -> Option<f64> {
        self.means[category]
    }
}

/// Aggregate figures for one category (the `/api/stats` shape).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub total: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
}

/// `CategorySummary` per category; `None` when a category had no values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeriesDescription {
    pub days: usize,
    pub categories: PerCategory<Option<CategorySummary>>,
}

/// Which chart configuration the dashboard draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    /// Observed values only, most recent N days.
    Single,
    /// Historical window plus forecast (solid vs dashed).
    Combined,
}

impl ChartMode {
    pub fn toggled(self) -> Self {
        match self {
            ChartMode::Single => ChartMode::Combined,
            ChartMode::Combined => ChartMode::Single,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ChartMode::Single => "single",
            ChartMode::Combined => "combined",
        }
    }
}

/// Where series come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// The dashboard HTTP API.
    Http,
    /// `historical.json` / `predictions.json` in a directory.
    File,
    /// Seeded synthetic data.
    Demo,
}
