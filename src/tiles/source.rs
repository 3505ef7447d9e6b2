use crate::core::{
    constants::{OPENTOPO_ATTRIBUTION, OPENTOPO_URL_TEMPLATE, OSM_ATTRIBUTION, OSM_URL_TEMPLATE},
    geo::TileCoord,
};
use serde::{Deserialize, Serialize};

/// Anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;

    fn attribution(&self) -> &str;

    fn min_zoom(&self) -> u8 {
        0
    }

    fn max_zoom(&self) -> u8 {
        18
    }
}

/// XYZ tile server addressed through a `{s}/{z}/{x}/{y}` URL template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlTemplateSource {
    pub url_template: String,
    /// Substituted for `{s}`, rotated per tile to spread load
    pub subdomains: Vec<String>,
    pub attribution: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

impl UrlTemplateSource {
    pub fn new(url_template: impl Into<String>, attribution: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            attribution: attribution.into(),
            min_zoom: 0,
            max_zoom: 18,
        }
    }

    /// OpenStreetMap standard tiles
    pub fn openstreetmap() -> Self {
        Self::new(OSM_URL_TEMPLATE, OSM_ATTRIBUTION)
    }

    /// OpenTopoMap; the servers stop at zoom 17
    pub fn opentopomap() -> Self {
        Self {
            max_zoom: 17,
            ..Self::new(OPENTOPO_URL_TEMPLATE, OPENTOPO_ATTRIBUTION)
        }
    }
}

impl TileSource for UrlTemplateSource {
    fn url(&self, coord: TileCoord) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let idx = ((coord.x + coord.y) % self.subdomains.len() as u32) as usize;
            self.subdomains[idx].as_str()
        };

        let url = self
            .url_template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string());

        if subdomain.is_empty() {
            url.replace("{s}.", "")
        } else {
            url.replace("{s}", subdomain)
        }
    }

    fn attribution(&self) -> &str {
        &self.attribution
    }

    fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    fn max_zoom(&self) -> u8 {
        self.max_zoom
    }
}
