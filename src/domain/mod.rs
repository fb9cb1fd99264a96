//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the fixed category set (`Category`, `PerCategory`)
//! - daily observations and date-ordered series (`DailyObservation`, `Series`)
//! - pipeline outputs (`MergedSeries`, `SummaryStats`, `SeriesDescription`)
//! - Indonesian date labels (`dates`)

pub mod dates;
pub mod types;

pub use types::*;
