//! Plain-text chart rendering.

pub mod ascii;

pub use ascii::render_ascii_chart;
