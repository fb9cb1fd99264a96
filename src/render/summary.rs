//! Stat cards: one text target per category showing its mean.

use crate::domain::{Category, SummaryStats};
use crate::error::RenderError;
use crate::render::surface::{Surface, stat_target};

/// Shown instead of a number when a category has no data.
pub const NO_DATA: &str = "-";

pub fn format_mean(mean: Option<f64>) -> String {
    match mean {
        Some(v) if v.is_finite() => format!("{v:.1}"),
        _ => NO_DATA.to_string(),
    }
}

/// Write every category's mean into its stat target.
///
/// All targets are checked before any is written.
pub fn render_summary(surface: &mut Surface, stats: &SummaryStats) -> Result<(), RenderError> {
    if let Some(missing) = Category::ALL
        .iter()
        .map(|&c| stat_target(c))
        .find(|id| surface.text(id).is_none())
    {
        return Err(RenderError::TargetMissing(missing.to_string()));
    }

    for category in Category::ALL {
        if let Some(text) = surface.text_mut(stat_target(category)) {
            *text = format_mean(stats.mean(category));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PerCategory;

    #[test]
    fn writes_one_decimal_and_placeholder() {
        let mut surface = Surface::with_dashboard_targets();
        let mut means = PerCategory::default();
        means[Category::Potong] = Some(13.5);
        means[Category::Kampung] = Some(6.46);
        render_summary(&mut surface, &SummaryStats { means }).unwrap();

        assert_eq!(surface.text("statPotong"), Some("13.5"));
        assert_eq!(surface.text("statKampung"), Some("6.5"));
        assert_eq!(surface.text("statTua"), Some(NO_DATA));
    }

    #[test]
    fn partial_targets_are_left_untouched() {
        let mut surface = Surface::new();
        surface.register("statPotong", crate::render::surface::TargetKind::Text);
        let stats = SummaryStats::default();
        assert!(render_summary(&mut surface, &stats).is_err());
        assert_eq!(surface.text("statPotong"), Some(""));
    }
}
