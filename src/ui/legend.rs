//! Depth legend: fixed depth ranges and their swatch colors

use crate::core::constants::{LEGEND_COLORS, LEGEND_DEPTHS_KM};
use crate::styling::{constant_color, Color};
use crate::ui::controls::ControlPosition;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
    pub position: ControlPosition,
}

impl Legend {
    /// Builds entries `a–b` from consecutive lower edges; the last is open-ended (`a+`)
    pub fn from_ranges(title: impl Into<String>, lower_edges: &[i32], colors: &[Color]) -> Self {
        let entries = lower_edges
            .iter()
            .zip(colors)
            .enumerate()
            .map(|(i, (lower, color))| {
                let label = match lower_edges.get(i + 1) {
                    Some(upper) => format!("{}–{}", lower, upper),
                    None => format!("{}+", lower),
                };
                LegendEntry {
                    label,
                    color: *color,
                }
            })
            .collect();

        Self {
            title: title.into(),
            entries,
            position: ControlPosition::BottomRight,
        }
    }

    /// The six depth buckets shown under the map
    pub fn depth() -> Self {
        let colors: Vec<Color> = LEGEND_COLORS.iter().map(|hex| constant_color(hex)).collect();
        Self::from_ranges("Depth (km)", &LEGEND_DEPTHS_KM, &colors)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(feature = "egui")]
    pub fn show(&self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new(&self.title).strong());
        for entry in &self.entries {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(18.0, 14.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 2.0, egui::Color32::from(entry.color));
                ui.label(&entry.label);
            });
        }
    }
}

impl Default for Legend {
    fn default() -> Self {
        Self::depth()
    }
}
