//! Plain-text output: the `show` dashboard and the `check` report.

pub mod format;

use crate::domain::{CategorySummary, PerCategory, Series};
use crate::error::FetchError;

pub use format::{format_check, format_dashboard, format_table};

/// Result of probing every endpoint once.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub source: String,
    pub historical: Result<Series, FetchError>,
    pub forecast: Result<Series, FetchError>,
    pub server_stats: Result<PerCategory<Option<CategorySummary>>, FetchError>,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.historical.is_ok() && self.forecast.is_ok() && self.server_stats.is_ok()
    }
}
