//! Typed view of the USGS earthquake feed

use crate::core::geo::LatLng;
use crate::data::geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry};
use crate::Result;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One seismic event read from a feed feature.
///
/// Depth and magnitude are expected to be present and numeric. When they are
/// not, they are carried as NaN and the styler decides what that looks like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Earthquake {
    pub id: Option<String>,
    pub position: LatLng,
    pub depth_km: f64,
    pub magnitude: f64,
    pub place: Option<String>,
    /// Origin time in milliseconds since the Unix epoch
    pub time_ms: Option<i64>,
}

impl Earthquake {
    /// Reads an event from a point feature. Features without a point
    /// geometry are not events and yield `None`.
    pub fn from_feature(feature: &GeoJsonFeature) -> Option<Self> {
        let coordinates = match feature.geometry.as_ref()? {
            GeoJsonGeometry::Point { coordinates } => coordinates,
            _ => return None,
        };
        let position = LatLng::from_position(coordinates)?;

        Some(Self {
            id: feature.id_string(),
            position,
            depth_km: coordinates.get(2).copied().unwrap_or(f64::NAN),
            magnitude: feature.property_f64("mag").unwrap_or(f64::NAN),
            place: feature.property_str("place").map(str::to_string),
            time_ms: feature.property_i64("time"),
        })
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.time_ms?).single()
    }
}

/// Shallowest and deepest event depth, in km
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthRange {
    pub min: f64,
    pub max: f64,
}

impl DepthRange {
    /// Reads `[minLon, minLat, minDepth, maxLon, maxLat, maxDepth]`
    pub fn from_bbox(bbox: &[f64]) -> Option<Self> {
        match bbox {
            [_, _, min, _, _, max] => Some(Self {
                min: *min,
                max: *max,
            }),
            _ => None,
        }
    }

    pub fn contains(&self, depth: f64) -> bool {
        depth >= self.min && depth <= self.max
    }
}

/// Parsed earthquake feed: the events in feed order plus the depth range
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuakeFeed {
    pub earthquakes: Vec<Earthquake>,
    pub depth_range: Option<DepthRange>,
    /// Features that were not point events
    pub skipped: usize,
}

impl QuakeFeed {
    pub fn from_geojson(geojson: &GeoJson) -> Self {
        let depth_range = geojson.bbox().and_then(DepthRange::from_bbox);
        let features = geojson.features();
        let earthquakes: Vec<Earthquake> =
            features.iter().filter_map(|f| Earthquake::from_feature(f)).collect();
        let skipped = features.len() - earthquakes.len();

        if skipped > 0 {
            log::warn!("skipped {} feed features without a point geometry", skipped);
        }

        Self {
            earthquakes,
            depth_range,
            skipped,
        }
    }

    pub fn from_str(json: &str) -> Result<Self> {
        Ok(Self::from_geojson(&GeoJson::from_str(json)?))
    }

    pub fn len(&self) -> usize {
        self.earthquakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.earthquakes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"{
        "type": "FeatureCollection",
        "bbox": [-178.2, -31.5, -1.9, 176.4, 64.8, 598.0],
        "features": [
            {"type": "Feature", "id": "us7000a",
             "properties": {"mag": 4.6, "place": "Kermadec Islands", "time": 1717171717000},
             "geometry": {"type": "Point", "coordinates": [-178.2, -31.5, 35.0]}},
            {"type": "Feature", "id": "nc7314",
             "properties": {"mag": 0.9, "place": "The Geysers, CA", "time": 1717171000000},
             "geometry": {"type": "Point", "coordinates": [-122.8, 38.8, 2.1]}}
        ]
    }"#;

    #[test]
    fn test_feed_keeps_order_and_depth_range() {
        let feed = QuakeFeed::from_str(FEED).unwrap();

        assert_eq!(feed.len(), 2);
        assert_eq!(feed.skipped, 0);
        assert_eq!(feed.earthquakes[0].place.as_deref(), Some("Kermadec Islands"));
        assert_eq!(feed.earthquakes[1].depth_km, 2.1);
        assert_eq!(feed.depth_range, Some(DepthRange { min: -1.9, max: 598.0 }));
        assert!(feed.depth_range.unwrap().contains(35.0));
    }

    #[test]
    fn test_empty_feed() {
        let feed = QuakeFeed::from_str(r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert!(feed.is_empty());
        assert!(feed.depth_range.is_none());
    }

    #[test]
    fn test_missing_values_become_nan() {
        let feature: GeoJsonFeature = serde_json::from_str(
            r#"{"type": "Feature", "properties": {"mag": null},
                "geometry": {"type": "Point", "coordinates": [10.0, 20.0]}}"#,
        )
        .unwrap();

        let quake = Earthquake::from_feature(&feature).unwrap();
        assert!(quake.magnitude.is_nan());
        assert!(quake.depth_km.is_nan());
        assert!(quake.time().is_none());
    }

    #[test]
    fn test_non_point_features_are_skipped() {
        let feed = QuakeFeed::from_str(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(feed.len(), 0);
        assert_eq!(feed.skipped, 1);
    }

    #[test]
    fn test_time_conversion() {
        let feed = QuakeFeed::from_str(FEED).unwrap();
        let time = feed.earthquakes[0].time().unwrap();
        assert_eq!(time.timestamp_millis(), 1_717_171_717_000);
    }

    #[test]
    fn test_depth_range_needs_three_dimensional_bbox() {
        assert!(DepthRange::from_bbox(&[-10.0, -10.0, 10.0, 10.0]).is_none());
    }
}
