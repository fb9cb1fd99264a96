//! The display surface: named targets the renderers draw into.
//!
//! A `Surface` plays the role of the page document. Front-ends register the
//! targets they can show (the TUI registers them once its layout exists);
//! renderers look targets up by id and replace their content wholesale.

use std::collections::BTreeMap;

use crate::domain::Category;
use crate::render::chart::{ChartId, ChartInstance};
use crate::render::table::TableRow;

pub const CHART_TARGET: &str = "predictionChart";
pub const TABLE_TARGET: &str = "tableBody";

/// Text target holding the summary figure of `category`.
pub fn stat_target(category: Category) -> &'static str {
    match category {
        Category::Potong => "statPotong",
        Category::Kampung => "statKampung",
        Category::Tua => "statTua",
    }
}

/// Every target the dashboard pipeline needs, with the kind it must have.
pub fn dashboard_targets() -> Vec<(&'static str, TargetKind)> {
    let mut ids = vec![(CHART_TARGET, TargetKind::Canvas), (TABLE_TARGET, TargetKind::TableBody)];
    ids.extend(Category::ALL.map(|c| (stat_target(c), TargetKind::Text)));
    ids
}

/// A chart-capable target. Tracks every chart instance attached to it.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    attached: Vec<ChartInstance>,
}

impl Canvas {
    pub fn attached(&self) -> &[ChartInstance] {
        &self.attached
    }

    /// The chart currently on display (the most recently attached one).
    pub fn live(&self) -> Option<&ChartInstance> {
        self.attached.last()
    }

    pub(crate) fn attach(&mut self, chart: ChartInstance) {
        self.attached.push(chart);
    }

    pub(crate) fn detach(&mut self, id: ChartId) {
        self.attached.retain(|c| c.id() != id);
    }
}

#[derive(Debug, Clone)]
pub enum Target {
    Canvas(Canvas),
    TableBody(Vec<TableRow>),
    Text(String),
}

impl Target {
    pub fn kind(&self) -> TargetKind {
        match self {
            Target::Canvas(_) => TargetKind::Canvas,
            Target::TableBody(_) => TargetKind::TableBody,
            Target::Text(_) => TargetKind::Text,
        }
    }
}

/// Kind of target to register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Canvas,
    TableBody,
    Text,
}

impl TargetKind {
    fn empty(self) -> Target {
        match self {
            TargetKind::Canvas => Target::Canvas(Canvas::default()),
            TargetKind::TableBody => Target::TableBody(Vec::new()),
            TargetKind::Text => Target::Text(String::new()),
        }
    }
}

/// Visible, non-blocking message (failures, "no data" hints).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct Surface {
    targets: BTreeMap<String, Target>,
    notice: Option<Notice>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface with every dashboard target already present.
    pub fn with_dashboard_targets() -> Self {
        let mut surface = Self::new();
        surface.register_dashboard_targets();
        surface
    }

    pub fn register_dashboard_targets(&mut self) {
        self.register(CHART_TARGET, TargetKind::Canvas);
        self.register(TABLE_TARGET, TargetKind::TableBody);
        for category in Category::ALL {
            self.register(stat_target(category), TargetKind::Text);
        }
    }

    /// Add a target. Re-registering an existing id keeps its content.
    pub fn register(&mut self, id: &str, kind: TargetKind) {
        self.targets.entry(id.to_string()).or_insert_with(|| kind.empty());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.targets.contains_key(id)
    }

    /// Ids from `required` that are absent or registered with another kind.
    pub fn missing<'a>(&self, required: &[(&'a str, TargetKind)]) -> Vec<&'a str> {
        required
            .iter()
            .filter(|(id, kind)| self.targets.get(*id).map(Target::kind) != Some(*kind))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn canvas(&self, id: &str) -> Option<&Canvas> {
        match self.targets.get(id) {
            Some(Target::Canvas(c)) => Some(c),
            _ => None,
        }
    }

    pub fn canvas_mut(&mut self, id: &str) -> Option<&mut Canvas> {
        match self.targets.get_mut(id) {
            Some(Target::Canvas(c)) => Some(c),
            _ => None,
        }
    }

    pub fn table(&self, id: &str) -> Option<&[TableRow]> {
        match self.targets.get(id) {
            Some(Target::TableBody(rows)) => Some(rows),
            _ => None,
        }
    }

    pub fn table_mut(&mut self, id: &str) -> Option<&mut Vec<TableRow>> {
        match self.targets.get_mut(id) {
            Some(Target::TableBody(rows)) => Some(rows),
            _ => None,
        }
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        match self.targets.get(id) {
            Some(Target::Text(t)) => Some(t),
            _ => None,
        }
    }

    pub fn text_mut(&mut self, id: &str) -> Option<&mut String> {
        match self.targets.get_mut(id) {
            Some(Target::Text(t)) => Some(t),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notice = Some(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent_and_lookup_is_kind_checked() {
        let mut s = Surface::new();
        s.register(TABLE_TARGET, TargetKind::TableBody);
        s.register("statPotong", TargetKind::Text);
        s.text_mut("statPotong").unwrap().push_str("22.7");

        s.register("statPotong", TargetKind::Text);
        assert_eq!(s.text("statPotong"), Some("22.7"));
        assert!(s.canvas(TABLE_TARGET).is_none());
        assert!(s.table(TABLE_TARGET).is_some());
    }

    #[test]
    fn missing_lists_absent_ids_in_order() {
        let mut s = Surface::new();
        s.register(CHART_TARGET, TargetKind::Canvas);
        let required = dashboard_targets();
        let missing = s.missing(&required);
        assert_eq!(missing[0], TABLE_TARGET);
        assert_eq!(missing.len(), required.len() - 1);

        assert!(Surface::with_dashboard_targets().missing(&required).is_empty());
    }

    #[test]
    fn target_of_the_wrong_kind_counts_as_missing() {
        let mut s = Surface::new();
        s.register(CHART_TARGET, TargetKind::Text);
        s.register(TABLE_TARGET, TargetKind::TableBody);
        for category in Category::ALL {
            s.register(stat_target(category), TargetKind::Text);
        }
        assert_eq!(s.missing(&dashboard_targets()), vec![CHART_TARGET]);
    }
}
