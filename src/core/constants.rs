//! Fixed endpoints, view defaults and paint constants of the earthquake map.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// USGS summary feed: every event of the past seven days.
pub const EARTHQUAKE_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

/// PB2002 plate model, served next to the application.
pub const TECTONIC_PLATES_PATH: &str = "GeoJson/PB2002_plates.json";

/// Initial map center (contiguous United States).
pub const DEFAULT_CENTER: (f64, f64) = (37.09, -95.71);

/// Initial zoom level.
pub const DEFAULT_ZOOM: f64 = 5.0;

pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 18.0;

/// Base layer names as shown in the layer control.
pub const STREET_MAP: &str = "Street Map";
pub const TOPOGRAPHIC_MAP: &str = "Topographic Map";

/// Overlay names as shown in the layer control.
pub const EARTHQUAKES_OVERLAY: &str = "Earthquakes";
pub const TECTONIC_PLATES_OVERLAY: &str = "Tectonic Plates";

pub const OSM_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

pub const OPENTOPO_URL_TEMPLATE: &str = "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png";
pub const OPENTOPO_ATTRIBUTION: &str = "Map data: © OpenStreetMap contributors, SRTM | Map style: © OpenTopoMap (CC-BY-SA)";

/// Marker radius in pixels per unit of magnitude.
pub const RADIUS_PER_MAGNITUDE: f32 = 4.0;

/// Upper bounds (inclusive) of the first three depth buckets, in km.
pub const DEPTH_THRESHOLDS_KM: [f64; 3] = [10.0, 30.0, 50.0];

/// Marker fill per depth bucket, shallow to very deep.
pub const DEPTH_COLORS: [&str; 4] = ["#66FF33", "#cadb2b", "#FF6600", "#FF0000"];

/// Lower edges of the legend's depth ranges, in km.
pub const LEGEND_DEPTHS_KM: [i32; 6] = [-10, 10, 30, 50, 70, 90];

/// Legend swatches, one per entry of [`LEGEND_DEPTHS_KM`].
pub const LEGEND_COLORS: [&str; 6] = ["#66FF33", "#BFFF00", "#FFFF00", "#FFA500", "#FF4500", "#FF0000"];

pub const PLATE_LINE_COLOR: &str = "#FF6347";
