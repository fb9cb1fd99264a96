//! Side-effecting stages: everything that writes into a `Surface`.

pub mod chart;
pub mod summary;
pub mod surface;
pub mod table;

pub use chart::{ChartRenderer, ChartSpec, ChartStyle, Palette};
pub use summary::render_summary;
pub use surface::{CHART_TARGET, Surface, TABLE_TARGET, TargetKind};
pub use table::{TableRenderer, TableRow, TableScope};
