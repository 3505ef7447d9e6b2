//! Assembly of the earthquake map from loaded feeds

use crate::{
    core::{
        config::QuakeMapConfig,
        constants::{EARTHQUAKES_OVERLAY, TECTONIC_PLATES_OVERLAY},
        geo::Point,
        map::Map,
        viewport::Viewport,
    },
    data::{geojson::GeoJson, quake::QuakeFeed},
    feed::LoadedFeeds,
    layers::{
        base::{LayerKind, LayerTrait},
        tile::TileLayer,
        vector::{CircleMarker, Polyline, VectorLayer},
    },
    styling::{plate_line_style, QuakeStyler},
    ui::{controls::LayerControl, legend::Legend, popup::PopupContent},
    Result,
};

const PLATES_Z_INDEX: i32 = 10;
const EARTHQUAKES_Z_INDEX: i32 = 20;

/// Builds a [`Map`] with both base layers, the available overlays, the
/// layer control and the depth legend.
pub struct MapBuilder {
    config: QuakeMapConfig,
    styler: QuakeStyler,
    size: Point,
}

impl MapBuilder {
    pub fn new(config: QuakeMapConfig) -> Self {
        Self {
            config,
            styler: QuakeStyler::default(),
            size: Point::new(1024.0, 768.0),
        }
    }

    pub fn with_styler(mut self, styler: QuakeStyler) -> Self {
        self.styler = styler;
        self
    }

    /// Initial container size in pixels; the viewer updates it every frame
    pub fn with_size(mut self, size: Point) -> Self {
        self.size = size;
        self
    }

    pub fn build(self, feeds: &LoadedFeeds) -> Result<Map> {
        let view = &self.config.view;
        let viewport = Viewport::new(view.center, view.zoom, self.size);
        let mut map = Map::new(viewport, LayerControl::new(view.collapsed_control));

        map.add_layer(Box::new(TileLayer::street()), LayerKind::Base)?;
        map.add_layer(Box::new(TileLayer::topographic()), LayerKind::Base)?;

        if let Some(feed) = &feeds.earthquakes {
            let mut layer = earthquake_layer(feed, &self.styler);
            layer.set_z_index(EARTHQUAKES_Z_INDEX);
            map.add_layer(Box::new(layer), LayerKind::Overlay)?;
            map.set_depth_range(feed.depth_range);
        } else {
            log::warn!("building map without the earthquake overlay");
        }

        if let Some(plates) = &feeds.plates {
            let mut layer = plates_layer(plates);
            layer.set_z_index(PLATES_Z_INDEX);
            // registered unchecked; shown once toggled in the control
            layer.set_visible(false);
            map.add_layer(Box::new(layer), LayerKind::Overlay)?;
        }

        if view.show_legend {
            map.set_legend(Some(Legend::depth()));
        }

        log::info!("map assembled with layers {:?}", map.list_layers());
        Ok(map)
    }
}

impl Default for MapBuilder {
    fn default() -> Self {
        Self::new(QuakeMapConfig::default())
    }
}

/// One circle marker per event, in feed order, with a place/time popup
pub fn earthquake_layer(feed: &QuakeFeed, styler: &QuakeStyler) -> VectorLayer {
    VectorLayer::from_points(
        "earthquakes".to_string(),
        EARTHQUAKES_OVERLAY.to_string(),
        &feed.earthquakes,
        |index, quake| {
            let id = quake.id.clone().unwrap_or_else(|| format!("quake-{}", index));
            Some(
                CircleMarker::new(id, quake.position, styler.marker_style(quake))
                    .with_popup(PopupContent::for_earthquake(quake)),
            )
        },
    )
}

/// Every line string and polygon ring of the plate model as a polyline
pub fn plates_layer(plates: &GeoJson) -> VectorLayer {
    let mut layer = VectorLayer::new("plates".to_string(), TECTONIC_PLATES_OVERLAY.to_string());
    let style = plate_line_style();

    for (index, feature) in plates.features().into_iter().enumerate() {
        let Some(geometry) = &feature.geometry else {
            continue;
        };
        let base_id = feature.id_string().unwrap_or_else(|| format!("plate-{}", index));
        for (part, path) in geometry.line_paths().into_iter().enumerate() {
            layer.add_polyline(Polyline::new(format!("{}-{}", base_id, part), path, style.clone()));
        }
    }
    layer
}
