//! Visualization id to panel lookup.

use std::collections::BTreeMap;

use tracing::debug;

use crate::catalog::{Catalog, VisualizationId};
use crate::error::{Error, Result};
use crate::panels;

/// Emphasis for a panel row; the renderer maps it onto the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Normal,
    Good,
    Watch,
    Bad,
    Accent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub label: String,
    pub value: String,
    pub tone: Tone,
}

impl PanelRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            tone,
        }
    }

    pub fn note(text: impl Into<String>) -> Self {
        Self::new(text, "", Tone::Normal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelSection {
    pub heading: &'static str,
    /// Tour anchor recorded for this section's screen area.
    pub anchor: Option<&'static str>,
    pub rows: Vec<PanelRow>,
}

impl PanelSection {
    pub fn new(heading: &'static str, rows: Vec<PanelRow>) -> Self {
        Self { heading, anchor: None, rows }
    }

    pub fn anchored(mut self, anchor: &'static str) -> Self {
        self.anchor = Some(anchor);
        self
    }
}

/// Everything the renderer needs to draw one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub sections: Vec<PanelSection>,
    /// Call-to-action shown at the bottom of the panel.
    pub action: Option<&'static str>,
}

/// A side-slot collaborator. Panels are pure fixtures: `view` has no side
/// effects and always returns the same content.
pub trait Panel: Send + Sync {
    fn id(&self) -> VisualizationId;
    fn view(&self) -> PanelView;

    /// Wide panels get more of the screen.
    fn wide(&self) -> bool {
        false
    }
}

#[derive(Default)]
pub struct PanelRegistry {
    panels: BTreeMap<VisualizationId, Box<dyn Panel>>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in panel.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for panel in panels::builtin() {
            registry.register(panel);
        }
        registry
    }

    /// Adds a panel; a later registration for the same id replaces the earlier one.
    pub fn register(&mut self, panel: Box<dyn Panel>) {
        self.panels.insert(panel.id(), panel);
    }

    pub fn resolve(&self, id: VisualizationId) -> Option<&dyn Panel> {
        self.panels.get(&id).map(|p| p.as_ref())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Fails if any panel the catalog can open has no collaborator.
    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        for id in catalog.visualizations() {
            if !self.panels.contains_key(&id) {
                return Err(Error::MissingPanel(id));
            }
        }
        debug!(panels = self.panels.len(), "Panel registry validated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub(VisualizationId);

    impl Panel for Stub {
        fn id(&self) -> VisualizationId {
            self.0
        }

        fn view(&self) -> PanelView {
            PanelView {
                title: "Stub",
                subtitle: "",
                sections: Vec::new(),
                action: None,
            }
        }
    }

    #[test]
    fn test_builtin_registry_covers_every_id() {
        let registry = PanelRegistry::builtin();
        assert_eq!(registry.len(), VisualizationId::ALL.len());
        for id in VisualizationId::ALL {
            let panel = registry.resolve(id).unwrap();
            assert_eq!(panel.id(), id);
            assert!(!panel.view().title.is_empty());
        }
    }

    #[test]
    fn test_builtin_registry_validates_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        assert!(PanelRegistry::builtin().validate(&catalog).is_ok());
    }

    #[test]
    fn test_missing_panel_fails_validation() {
        let catalog = Catalog::builtin().unwrap();
        let mut registry = PanelRegistry::new();
        registry.register(Box::new(Stub(VisualizationId::FlightRisk)));

        let err = registry.validate(&catalog).unwrap_err();
        assert!(matches!(err, Error::MissingPanel(_)));
        assert!(registry.resolve(VisualizationId::Help).is_none());
    }

    #[test]
    fn test_register_replaces_existing_panel() {
        let mut registry = PanelRegistry::builtin();
        registry.register(Box::new(Stub(VisualizationId::Help)));
        assert_eq!(registry.resolve(VisualizationId::Help).unwrap().view().title, "Stub");
        assert_eq!(registry.len(), VisualizationId::ALL.len());
    }
}
