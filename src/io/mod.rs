//! Input/output helpers.
//!
//! - merged-series CSV export (`export`)

pub mod export;

pub use export::*;
