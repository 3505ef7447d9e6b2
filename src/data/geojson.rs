use crate::core::geo::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A GeoJSON position: `[lon, lat]` optionally followed by altitude/depth
pub type Position = Vec<f64>;

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    pub id: Option<serde_json::Value>,
    pub geometry: Option<GeoJsonGeometry>,
    pub properties: Option<HashMap<String, serde_json::Value>>,
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bbox: Option<Vec<f64>>,
        features: Vec<GeoJsonFeature>,
    },
}

impl GeoJson {
    /// Parses a GeoJSON document
    pub fn from_str(geojson_str: &str) -> crate::Result<Self> {
        serde_json::from_str(geojson_str)
            .map_err(|e| crate::Error::ParseError(format!("Invalid GeoJSON: {}", e)))
    }

    /// Parses a GeoJSON document from raw bytes
    pub fn from_slice(bytes: &[u8]) -> crate::Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| crate::Error::ParseError(format!("Invalid GeoJSON: {}", e)))
    }

    /// Top-level bounding box, if the document carries one
    pub fn bbox(&self) -> Option<&[f64]> {
        match self {
            GeoJson::FeatureCollection { bbox, .. } => bbox.as_deref(),
            GeoJson::Feature(_) => None,
        }
    }

    /// Gets all features; a bare feature counts as a collection of one
    pub fn features(&self) -> Vec<&GeoJsonFeature> {
        match self {
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::FeatureCollection { features, .. } => features.iter().collect(),
        }
    }

    /// Gets the bounding box of all feature geometries
    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.features()
            .into_iter()
            .filter_map(|f| f.geometry.as_ref())
            .filter_map(|g| LatLngBounds::from_points(&g.to_lat_lng_points()))
            .reduce(|acc, b| acc.union(&b))
    }
}

impl GeoJsonFeature {
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.as_ref()?.get(key)
    }

    /// Numeric property; `null`, missing and non-numeric values give `None`
    pub fn property_f64(&self, key: &str) -> Option<f64> {
        self.property(key)?.as_f64()
    }

    pub fn property_i64(&self, key: &str) -> Option<i64> {
        let value = self.property(key)?;
        value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
    }

    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.property(key)?.as_str()
    }

    /// The feature id as a string, whether the document used a string or a number
    pub fn id_string(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl GeoJsonGeometry {
    /// Converts coordinates to LatLng points
    pub fn to_lat_lng_points(&self) -> Vec<LatLng> {
        match self {
            GeoJsonGeometry::Point { coordinates } => {
                LatLng::from_position(coordinates).into_iter().collect()
            }
            GeoJsonGeometry::LineString { coordinates }
            | GeoJsonGeometry::MultiPoint { coordinates } => to_lat_lngs(coordinates),
            GeoJsonGeometry::Polygon { coordinates }
            | GeoJsonGeometry::MultiLineString { coordinates } => {
                coordinates.iter().flat_map(|ring| to_lat_lngs(ring)).collect()
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .flatten()
                .flat_map(|ring| to_lat_lngs(ring))
                .collect(),
            GeoJsonGeometry::GeometryCollection { geometries } => geometries
                .iter()
                .flat_map(|geom| geom.to_lat_lng_points())
                .collect(),
        }
    }

    /// Every path in the geometry drawn as a polyline: line strings as-is,
    /// polygon rings as closed paths. Point geometries have none.
    pub fn line_paths(&self) -> Vec<Vec<LatLng>> {
        let mut paths = match self {
            GeoJsonGeometry::Point { .. } | GeoJsonGeometry::MultiPoint { .. } => Vec::new(),
            GeoJsonGeometry::LineString { coordinates } => vec![to_lat_lngs(coordinates)],
            GeoJsonGeometry::Polygon { coordinates }
            | GeoJsonGeometry::MultiLineString { coordinates } => {
                coordinates.iter().map(|ring| to_lat_lngs(ring)).collect()
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .flatten()
                .map(|ring| to_lat_lngs(ring))
                .collect(),
            GeoJsonGeometry::GeometryCollection { geometries } => {
                geometries.iter().flat_map(|geom| geom.line_paths()).collect()
            }
        };
        paths.retain(|path| path.len() >= 2);
        paths
    }
}

fn to_lat_lngs(positions: &[Position]) -> Vec<LatLng> {
    positions
        .iter()
        .filter_map(|p| LatLng::from_position(p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_collection_parsing() {
        let geojson_str = r#"
        {
            "type": "FeatureCollection",
            "metadata": {"title": "USGS All Earthquakes, Past Week"},
            "bbox": [-179.9, -60.1, -3.2, 179.8, 71.4, 620.5],
            "features": [
                {
                    "type": "Feature",
                    "id": "ak0245",
                    "properties": {"mag": 1.7, "place": "8 km SW of Anchor Point, Alaska", "time": 1700000000000},
                    "geometry": {"type": "Point", "coordinates": [-151.9, 59.7, 42.1]}
                }
            ]
        }
        "#;

        let geojson = GeoJson::from_str(geojson_str).unwrap();
        assert_eq!(geojson.bbox().map(|b| b.len()), Some(6));

        let features = geojson.features();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].id_string().as_deref(), Some("ak0245"));
        assert_eq!(features[0].property_f64("mag"), Some(1.7));
        assert_eq!(features[0].property_i64("time"), Some(1_700_000_000_000));
        assert_eq!(
            features[0].property_str("place"),
            Some("8 km SW of Anchor Point, Alaska")
        );
    }

    #[test]
    fn test_null_properties_read_as_none() {
        let feature: GeoJsonFeature = serde_json::from_str(
            r#"{"type": "Feature", "properties": {"mag": null}, "geometry": null}"#,
        )
        .unwrap();

        assert_eq!(feature.property_f64("mag"), None);
        assert_eq!(feature.property_f64("depth"), None);
        assert!(feature.geometry.is_none());
    }

    #[test]
    fn test_rejects_non_geojson() {
        assert!(matches!(
            GeoJson::from_str(r#"{"type": "Topology"}"#),
            Err(crate::Error::ParseError(_))
        ));
        assert!(GeoJson::from_str("not json").is_err());
    }

    #[test]
    fn test_point_geometry_drops_depth() {
        let geometry = GeoJsonGeometry::Point {
            coordinates: vec![-74.0060, 40.7128, 5.0],
        };

        let points = geometry.to_lat_lng_points();
        assert_eq!(points, vec![LatLng::new(40.7128, -74.0060)]);
        assert!(geometry.line_paths().is_empty());
    }

    #[test]
    fn test_polygon_rings_become_paths() {
        let geometry = GeoJsonGeometry::MultiPolygon {
            coordinates: vec![
                vec![vec![vec![0.0, 0.0], vec![10.0, 0.0], vec![10.0, 10.0], vec![0.0, 0.0]]],
                vec![vec![vec![20.0, 20.0], vec![30.0, 20.0], vec![20.0, 20.0]]],
            ],
        };

        let paths = geometry.line_paths();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].len(), 4);
        assert_eq!(paths[1][1], LatLng::new(20.0, 30.0));
    }

    #[test]
    fn test_bounds_calculation() {
        let geojson = GeoJson::FeatureCollection {
            bbox: None,
            features: vec![
                GeoJsonFeature {
                    id: None,
                    properties: None,
                    geometry: Some(GeoJsonGeometry::Point {
                        coordinates: vec![-74.0060, 40.7128],
                    }),
                },
                GeoJsonFeature {
                    id: None,
                    properties: None,
                    geometry: Some(GeoJsonGeometry::Point {
                        coordinates: vec![-73.9857, 40.7489],
                    }),
                },
            ],
        };

        let bounds = geojson.bounds().unwrap();
        assert_eq!(bounds.south_west.lat, 40.7128);
        assert_eq!(bounds.north_east.lat, 40.7489);
    }
}
