//! Pure data stages: alignment and statistics.

pub mod align;
pub mod stats;

pub use align::merge;
pub use stats::{describe, summarize};
