//! Layer-toggle control: one radio group of base layers, a checkbox per overlay

use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Corner of the map a control is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[cfg(feature = "egui")]
impl ControlPosition {
    pub fn calculate_rect(&self, container: egui::Rect, size: egui::Vec2, margin: f32) -> egui::Rect {
        use egui::{Pos2, Rect};

        let pos = match self {
            ControlPosition::TopLeft => Pos2::new(container.min.x + margin, container.min.y + margin),
            ControlPosition::TopRight => {
                Pos2::new(container.max.x - margin - size.x, container.min.y + margin)
            }
            ControlPosition::BottomLeft => {
                Pos2::new(container.min.x + margin, container.max.y - margin - size.y)
            }
            ControlPosition::BottomRight => container.max - size - egui::Vec2::splat(margin),
        };
        Rect::from_min_size(pos, size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlEntry {
    pub layer_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayEntry {
    pub layer_id: String,
    pub name: String,
    pub checked: bool,
}

/// What the user changed in the control this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlAction {
    SelectBase(String),
    ToggleOverlay { name: String, visible: bool },
}

/// State of the layer-toggle control. The map keeps layer visibility in
/// step with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerControl {
    base_layers: Vec<ControlEntry>,
    overlays: Vec<OverlayEntry>,
    active_base: Option<usize>,
    pub collapsed: bool,
    pub position: ControlPosition,
}

impl LayerControl {
    pub fn new(collapsed: bool) -> Self {
        Self {
            base_layers: Vec::new(),
            overlays: Vec::new(),
            active_base: None,
            collapsed,
            position: ControlPosition::TopRight,
        }
    }

    /// Registers a base layer; the first one registered becomes active
    pub fn add_base_layer(&mut self, layer_id: impl Into<String>, name: impl Into<String>) {
        self.base_layers.push(ControlEntry {
            layer_id: layer_id.into(),
            name: name.into(),
        });
        if self.active_base.is_none() {
            self.active_base = Some(0);
        }
    }

    pub fn add_overlay(&mut self, layer_id: impl Into<String>, name: impl Into<String>, checked: bool) {
        self.overlays.push(OverlayEntry {
            layer_id: layer_id.into(),
            name: name.into(),
            checked,
        });
    }

    /// Drops whatever entry points at `layer_id`
    pub fn remove_layer(&mut self, layer_id: &str) {
        let active_id = self.active_base_layer().map(|e| e.layer_id.clone());
        self.base_layers.retain(|e| e.layer_id != layer_id);
        self.overlays.retain(|e| e.layer_id != layer_id);
        self.active_base = match active_id {
            Some(id) if id != layer_id => self.base_layers.iter().position(|e| e.layer_id == id),
            _ if self.base_layers.is_empty() => None,
            _ => Some(0),
        };
    }

    pub fn base_layers(&self) -> &[ControlEntry] {
        &self.base_layers
    }

    pub fn overlays(&self) -> &[OverlayEntry] {
        &self.overlays
    }

    pub fn active_base_layer(&self) -> Option<&ControlEntry> {
        self.base_layers.get(self.active_base?)
    }

    /// Makes `name` the active base layer. Returns the entry that was active before.
    pub fn select_base(&mut self, name: &str) -> Result<Option<ControlEntry>> {
        let index = self
            .base_layers
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| MapError::Layer(format!("unknown base layer '{}'", name)))?;
        let previous = self.active_base_layer().cloned();
        self.active_base = Some(index);
        Ok(previous)
    }

    /// Checks or unchecks an overlay and returns its layer id
    pub fn set_overlay(&mut self, name: &str, checked: bool) -> Result<String> {
        let entry = self
            .overlays
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| MapError::Layer(format!("unknown overlay '{}'", name)))?;
        entry.checked = checked;
        Ok(entry.layer_id.clone())
    }

    pub fn overlay_checked(&self, name: &str) -> Option<bool> {
        self.overlays.iter().find(|e| e.name == name).map(|e| e.checked)
    }

    /// Whether `layer_id` should currently be drawn
    pub fn is_layer_active(&self, layer_id: &str) -> bool {
        self.active_base_layer().is_some_and(|e| e.layer_id == layer_id)
            || self
                .overlays
                .iter()
                .any(|e| e.layer_id == layer_id && e.checked)
    }

    /// Draws the control panel and reports what changed.
    #[cfg(feature = "egui")]
    pub fn show(&mut self, ui: &mut egui::Ui) -> Vec<ControlAction> {
        let mut actions = Vec::new();

        let header = if self.collapsed { "▸ Layers" } else { "▾ Layers" };
        if ui.small_button(header).clicked() {
            self.collapsed = !self.collapsed;
        }
        if self.collapsed {
            return actions;
        }

        let active = self.active_base;
        for (index, entry) in self.base_layers.iter().enumerate() {
            if ui.radio(active == Some(index), entry.name.as_str()).clicked() && active != Some(index) {
                actions.push(ControlAction::SelectBase(entry.name.clone()));
            }
        }
        if !self.overlays.is_empty() {
            ui.separator();
        }
        for entry in &self.overlays {
            let mut checked = entry.checked;
            if ui.checkbox(&mut checked, entry.name.as_str()).changed() {
                actions.push(ControlAction::ToggleOverlay {
                    name: entry.name.clone(),
                    visible: checked,
                });
            }
        }
        actions
    }
}

impl Default for LayerControl {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control() -> LayerControl {
        let mut control = LayerControl::default();
        control.add_base_layer("street", "Street Map");
        control.add_base_layer("topographic", "Topographic Map");
        control.add_overlay("plates", "Tectonic Plates", false);
        control.add_overlay("earthquakes", "Earthquakes", true);
        control
    }

    #[test]
    fn test_first_base_layer_is_active() {
        let control = control();
        assert_eq!(control.active_base_layer().unwrap().name, "Street Map");
        assert!(control.is_layer_active("street"));
        assert!(!control.is_layer_active("topographic"));
        assert!(control.is_layer_active("earthquakes"));
        assert!(!control.is_layer_active("plates"));
    }

    #[test]
    fn test_base_layers_are_exclusive() {
        let mut control = control();
        let previous = control.select_base("Topographic Map").unwrap();

        assert_eq!(previous.unwrap().layer_id, "street");
        assert!(control.is_layer_active("topographic"));
        assert!(!control.is_layer_active("street"));
        assert!(control.select_base("Satellite").is_err());
    }

    #[test]
    fn test_overlays_toggle_independently() {
        let mut control = control();
        assert_eq!(control.set_overlay("Tectonic Plates", true).unwrap(), "plates");
        control.set_overlay("Earthquakes", false).unwrap();

        assert_eq!(control.overlay_checked("Tectonic Plates"), Some(true));
        assert_eq!(control.overlay_checked("Earthquakes"), Some(false));
        assert!(control.set_overlay("Faults", true).is_err());
    }

    #[test]
    fn test_removing_active_base_falls_back() {
        let mut control = control();
        control.select_base("Topographic Map").unwrap();
        control.remove_layer("topographic");
        assert_eq!(control.active_base_layer().unwrap().layer_id, "street");

        control.remove_layer("plates");
        assert_eq!(control.overlays().len(), 1);
    }
}
