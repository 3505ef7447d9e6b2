use crate::{
    core::{
        constants::{STREET_MAP, TOPOGRAPHIC_MAP},
        geo::TileCoord,
        viewport::Viewport,
    },
    impl_layer_trait,
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::context::{DrawCommand, RenderContext},
    tiles::source::{TileSource, UrlTemplateSource},
    Result,
};

/// A raster base layer backed by an XYZ tile server
pub struct TileLayer {
    properties: LayerProperties,
    source: UrlTemplateSource,
}

impl TileLayer {
    pub fn new(id: String, name: String, source: UrlTemplateSource) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Tile),
            source,
        }
    }

    /// OpenStreetMap street tiles
    pub fn street() -> Self {
        Self::new(
            "street".to_string(),
            STREET_MAP.to_string(),
            UrlTemplateSource::openstreetmap(),
        )
    }

    /// OpenTopoMap terrain tiles
    pub fn topographic() -> Self {
        Self::new(
            "topographic".to_string(),
            TOPOGRAPHIC_MAP.to_string(),
            UrlTemplateSource::opentopomap(),
        )
    }

    pub fn attribution(&self) -> &str {
        self.source.attribution()
    }

    pub fn tile_url(&self, coord: TileCoord) -> String {
        self.source.url(coord)
    }
}

impl LayerTrait for TileLayer {
    impl_layer_trait!(TileLayer, properties);

    fn render(&self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        let zoom = viewport.tile_zoom(self.source.min_zoom(), self.source.max_zoom());

        for (coord, bounds) in viewport.visible_tiles(zoom) {
            context.draw(DrawCommand::Tile {
                layer_id: self.properties.id.clone(),
                coord,
                url: self.source.url(coord),
                bounds,
                opacity: self.properties.opacity,
            });
        }
        Ok(())
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "url_template": self.source.url_template,
            "subdomains": self.source.subdomains,
            "attribution": self.source.attribution,
            "min_zoom": self.source.min_zoom,
            "max_zoom": self.source.max_zoom,
        })
    }
}
