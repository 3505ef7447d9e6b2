//! Prelude module for common quakemap types and traits
//!
//! `use quakemap::prelude::*;` pulls in everything needed to load the feeds
//! and assemble a map.

pub use crate::core::{
    builder::MapBuilder,
    config::{FeedConfig, QuakeMapConfig, TileLoadingConfig, ViewConfig},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{Map, MapSnapshot},
    viewport::Viewport,
};

pub use crate::data::{
    geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry},
    quake::{DepthRange, Earthquake, QuakeFeed},
};

pub use crate::feed::{FeedLoader, FeedSource, LoadedFeeds};

pub use crate::layers::{
    base::{LayerKind, LayerTrait, LayerType},
    manager::LayerManager,
    tile::TileLayer,
    vector::{CircleMarker, LineStyle, MarkerStyle, Polyline, VectorLayer},
};

pub use crate::rendering::context::{DrawCommand, RenderContext};

pub use crate::styling::{depth_color, magnitude_radius, Color, QuakeStyler};

pub use crate::tiles::{cache::TileCache, loader::TileLoader, source::TileSource};

pub use crate::ui::{
    controls::{ControlPosition, LayerControl},
    legend::{Legend, LegendEntry},
    popup::PopupContent,
};

#[cfg(feature = "egui")]
pub use crate::ui::widget::{MapWidget, MapWidgetExt};

pub use crate::{Error as MapError, Result};

pub use std::{
    sync::Arc,
    time::{Duration, Instant},
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
