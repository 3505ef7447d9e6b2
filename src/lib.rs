//! # quakemap
//!
//! Renders the USGS weekly earthquake feed onto an interactive map.
//!
//! The pipeline runs one way: the [`feed`] module fetches GeoJSON, the
//! [`styling`] module maps each event's depth and magnitude to marker paint,
//! and [`core::builder::MapBuilder`] assembles base tile layers, overlays, a
//! layer control and a depth legend into a [`Map`].

pub mod core;
pub mod data;
pub mod feed;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod styling;
pub mod tiles;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    builder::MapBuilder,
    config::QuakeMapConfig,
    geo::{LatLng, LatLngBounds, TileCoord},
    map::Map,
    viewport::Viewport,
};

pub use crate::data::{
    geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry},
    quake::{DepthRange, Earthquake, QuakeFeed},
};

pub use crate::feed::{FeedLoader, FeedSource, LoadedFeeds};

pub use crate::layers::{base::LayerTrait, tile::TileLayer, vector::VectorLayer};

pub use crate::styling::{Color, QuakeStyler};

pub use crate::ui::{controls::LayerControl, legend::Legend, popup::PopupContent};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = MapError;
