use crate::{
    core::{
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    data::quake::DepthRange,
    layers::{
        base::{LayerKind, LayerTrait, LayerType},
        manager::LayerManager,
        vector::{CircleMarker, VectorLayer},
    },
    rendering::context::RenderContext,
    ui::{
        controls::{ControlAction, LayerControl},
        legend::Legend,
    },
    MapError, Result,
};
use serde::{Deserialize, Serialize};

/// The assembled map: viewport, layers, the layer control and the legend.
///
/// Layer visibility follows the control: the active base layer and the
/// checked overlays are visible, everything else is hidden.
pub struct Map {
    viewport: Viewport,
    layers: LayerManager,
    control: LayerControl,
    legend: Option<Legend>,
    depth_range: Option<DepthRange>,
}

impl Map {
    pub fn new(viewport: Viewport, control: LayerControl) -> Self {
        Self {
            viewport,
            layers: LayerManager::new(),
            control,
            legend: None,
            depth_range: None,
        }
    }

    pub fn set_legend(&mut self, legend: Option<Legend>) {
        self.legend = legend;
    }

    pub fn set_depth_range(&mut self, depth_range: Option<DepthRange>) {
        self.depth_range = depth_range;
    }

    /// Adds a layer and registers it with the layer control. An overlay
    /// starts checked when the layer itself is visible.
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>, kind: LayerKind) -> Result<()> {
        let id = layer.id().to_string();
        let name = layer.name().to_string();
        let visible = layer.is_visible();

        self.layers.add_layer(layer)?;
        match kind {
            LayerKind::Base => self.control.add_base_layer(&id, &name),
            LayerKind::Overlay => self.control.add_overlay(&id, &name, visible),
        }
        log::debug!("added {:?} layer '{}'", kind, id);

        self.sync_visibility();
        Ok(())
    }

    pub fn remove_layer(&mut self, layer_id: &str) -> Result<Box<dyn LayerTrait>> {
        let layer = self
            .layers
            .remove_layer(layer_id)
            .ok_or_else(|| MapError::Layer(format!("unknown layer '{}'", layer_id)))?;
        self.control.remove_layer(layer_id);
        self.sync_visibility();
        Ok(layer)
    }

    pub fn layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layers.get_layer(layer_id)
    }

    pub fn layer_as<T: 'static>(&self, layer_id: &str) -> Option<&T> {
        self.layers.layer_as::<T>(layer_id)
    }

    /// Layer IDs bottom to top
    pub fn list_layers(&self) -> Vec<String> {
        self.layers.list_layers()
    }

    pub fn layers(&self) -> &LayerManager {
        &self.layers
    }

    pub fn select_base_layer(&mut self, name: &str) -> Result<()> {
        self.control.select_base(name)?;
        self.sync_visibility();
        Ok(())
    }

    pub fn set_overlay_visible(&mut self, name: &str, visible: bool) -> Result<()> {
        self.control.set_overlay(name, visible)?;
        self.sync_visibility();
        Ok(())
    }

    /// Carries the base layer, overlay checks and collapsed state of an
    /// earlier control over to this map. Names this map lacks are skipped;
    /// overlays the earlier control never listed keep their defaults.
    pub fn restore_selection(&mut self, previous: &LayerControl) {
        if let Some(base) = previous.active_base_layer() {
            if self.control.select_base(&base.name).is_err() {
                log::debug!("base layer '{}' is gone after rebuild", base.name);
            }
        }
        for overlay in previous.overlays() {
            if self.control.set_overlay(&overlay.name, overlay.checked).is_err() {
                log::debug!("overlay '{}' is gone after rebuild", overlay.name);
            }
        }
        self.control.collapsed = previous.collapsed;
        self.sync_visibility();
    }

    pub fn apply_control_action(&mut self, action: ControlAction) -> Result<()> {
        match action {
            ControlAction::SelectBase(name) => self.select_base_layer(&name),
            ControlAction::ToggleOverlay { name, visible } => self.set_overlay_visible(&name, visible),
        }
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.viewport.set_center(center);
        self.viewport.set_zoom(zoom);
    }

    /// Pans by a pixel offset, as a drag would
    pub fn pan(&mut self, delta: Point) {
        self.viewport.pan(delta);
    }

    pub fn zoom_to(&mut self, zoom: f64, focus: Option<Point>) {
        self.viewport.zoom_to(zoom, focus);
    }

    pub fn set_size(&mut self, size: Point) {
        self.viewport.set_size(size);
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn control(&self) -> &LayerControl {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut LayerControl {
        &mut self.control
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    pub fn depth_range(&self) -> Option<DepthRange> {
        self.depth_range
    }

    /// Topmost visible marker under `pixel` (container coordinates)
    pub fn marker_at(&self, pixel: &Point) -> Option<&CircleMarker> {
        self.layers
            .layers()
            .into_iter()
            .rev()
            .filter(|layer| layer.is_visible() && layer.layer_type() == LayerType::Vector)
            .filter_map(|layer| layer.as_any().downcast_ref::<VectorLayer>())
            .find_map(|layer| layer.marker_at(pixel, &self.viewport))
    }

    /// Queues draw commands for every visible layer, bottom to top
    pub fn render(&self, context: &mut RenderContext) -> Result<()> {
        context.begin_frame();
        self.layers.render(context, &self.viewport)
    }

    pub fn snapshot(&self) -> MapSnapshot {
        let describe = |layer_id: &str| {
            self.layers.get_layer(layer_id).map(|layer| LayerSnapshot {
                id: layer.id().to_string(),
                name: layer.name().to_string(),
                layer_type: layer.layer_type(),
                visible: layer.is_visible(),
                z_index: layer.z_index(),
                opacity: layer.opacity(),
                options: layer.options(),
            })
        };

        MapSnapshot {
            center: self.viewport.center,
            zoom: self.viewport.zoom,
            active_base_layer: self.control.active_base_layer().map(|e| e.name.clone()),
            base_layers: self
                .control
                .base_layers()
                .iter()
                .filter_map(|e| describe(&e.layer_id))
                .collect(),
            overlays: self
                .control
                .overlays()
                .iter()
                .filter_map(|e| describe(&e.layer_id))
                .collect(),
            control: self.control.clone(),
            legend: self.legend.clone(),
            depth_range: self.depth_range,
        }
    }

    fn sync_visibility(&mut self) {
        for id in self.layers.list_layers() {
            let active = self.control.is_layer_active(&id);
            self.layers.with_layer_mut(&id, |layer| layer.set_visible(active));
        }
    }
}

/// One layer as it appears in a [`MapSnapshot`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    pub visible: bool,
    pub z_index: i32,
    pub opacity: f32,
    pub options: serde_json::Value,
}

/// Serializable description of an assembled map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub center: LatLng,
    pub zoom: f64,
    pub active_base_layer: Option<String>,
    pub base_layers: Vec<LayerSnapshot>,
    pub overlays: Vec<LayerSnapshot>,
    pub control: LayerControl,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_range: Option<DepthRange>,
}

impl MapSnapshot {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn overlay(&self, name: &str) -> Option<&LayerSnapshot> {
        self.overlays.iter().find(|layer| layer.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{
        tile::TileLayer,
        vector::MarkerStyle,
    };

    fn map() -> Map {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 3.0, Point::new(800.0, 600.0));
        let mut map = Map::new(viewport, LayerControl::default());
        map.add_layer(Box::new(TileLayer::street()), LayerKind::Base).unwrap();
        map.add_layer(Box::new(TileLayer::topographic()), LayerKind::Base).unwrap();

        let mut quakes = VectorLayer::new("earthquakes".into(), "Earthquakes".into());
        quakes.set_z_index(20);
        quakes.add_circle_marker(CircleMarker::new(
            "q1",
            LatLng::new(0.0, 0.0),
            MarkerStyle {
                radius: 10.0,
                ..MarkerStyle::default()
            },
        ));
        map.add_layer(Box::new(quakes), LayerKind::Overlay).unwrap();
        map
    }

    #[test]
    fn test_visibility_follows_control() {
        let mut map = map();
        assert!(map.layer("street").unwrap().is_visible());
        assert!(!map.layer("topographic").unwrap().is_visible());

        map.select_base_layer("Topographic Map").unwrap();
        assert!(!map.layer("street").unwrap().is_visible());
        assert!(map.layer("topographic").unwrap().is_visible());

        map.set_overlay_visible("Earthquakes", false).unwrap();
        assert!(!map.layer("earthquakes").unwrap().is_visible());
    }

    #[test]
    fn test_restore_selection_after_rebuild() {
        let mut before = map();
        before.select_base_layer("Topographic Map").unwrap();
        before.set_overlay_visible("Earthquakes", false).unwrap();
        before.control_mut().collapsed = true;

        let mut rebuilt = map();
        let mut plates = VectorLayer::new("plates".into(), "Tectonic Plates".into());
        plates.set_visible(false);
        rebuilt.add_layer(Box::new(plates), LayerKind::Overlay).unwrap();
        rebuilt.restore_selection(before.control());

        assert_eq!(
            rebuilt.control().active_base_layer().map(|e| e.name.as_str()),
            Some("Topographic Map")
        );
        assert!(rebuilt.layer("topographic").unwrap().is_visible());
        assert!(!rebuilt.layer("street").unwrap().is_visible());
        assert!(!rebuilt.layer("earthquakes").unwrap().is_visible());
        assert_eq!(rebuilt.control().overlay_checked("Tectonic Plates"), Some(false));
        assert!(rebuilt.control().collapsed);
    }

    #[test]
    fn test_unknown_names_are_errors() {
        let mut map = map();
        assert!(matches!(map.select_base_layer("Satellite"), Err(MapError::Layer(_))));
        assert!(map.set_overlay_visible("Faults", true).is_err());
        assert!(map.remove_layer("missing").is_err());
    }

    #[test]
    fn test_marker_at_only_hits_visible_layers() {
        let mut map = map();
        assert_eq!(map.marker_at(&Point::new(400.0, 300.0)).unwrap().id, "q1");

        map.set_overlay_visible("Earthquakes", false).unwrap();
        assert!(map.marker_at(&Point::new(400.0, 300.0)).is_none());
    }

    #[test]
    fn test_render_skips_hidden_base_layer() {
        let map = map();
        let mut context = RenderContext::new(800, 600);
        map.render(&mut context).unwrap();

        let queue = context.drawing_queue();
        assert!(queue.iter().any(|cmd| matches!(
            cmd,
            crate::rendering::context::DrawCommand::Tile { layer_id, .. } if layer_id == "street"
        )));
        assert!(!queue.iter().any(|cmd| matches!(
            cmd,
            crate::rendering::context::DrawCommand::Tile { layer_id, .. } if layer_id == "topographic"
        )));
        assert_eq!(context.circle_count(), 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut map = map();
        map.remove_layer("topographic").unwrap();
        let snapshot = map.snapshot();

        assert_eq!(snapshot.base_layers.len(), 1);
        assert_eq!(snapshot.active_base_layer.as_deref(), Some("Street Map"));
        assert_eq!(snapshot.overlay("Earthquakes").unwrap().options["marker_count"], 1);

        let json = snapshot.to_json_pretty().unwrap();
        let back: MapSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.zoom, 3.0);
    }
}
