//! Configuration for the feed loader, the initial view and tile loading
//!
//! Every field defaults to the fixed endpoints and view of the earthquake map;
//! the viewer's command line overrides individual fields.

use crate::core::constants::{
    DEFAULT_CENTER, DEFAULT_ZOOM, EARTHQUAKE_FEED_URL, TECTONIC_PLATES_PATH,
};
use crate::core::geo::LatLng;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuakeMapConfig {
    pub feed: FeedConfig,
    pub view: ViewConfig,
    pub tiles: TileLoadingConfig,
}

impl QuakeMapConfig {
    /// Drops the plates overlay entirely
    pub fn without_plates(mut self) -> Self {
        self.feed.plates_source = None;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub earthquakes_url: String,
    /// URL or local path of the plate boundaries; `None` skips the overlay
    pub plates_source: Option<String>,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            earthquakes_url: EARTHQUAKE_FEED_URL.to_string(),
            plates_source: Some(TECTONIC_PLATES_PATH.to_string()),
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("quakemap/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub center: LatLng,
    pub zoom: f64,
    /// Whether the layer control starts collapsed
    pub collapsed_control: bool,
    pub show_legend: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            zoom: DEFAULT_ZOOM,
            collapsed_control: false,
            show_legend: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileLoadingConfig {
    pub cache_size: usize,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for TileLoadingConfig {
    fn default() -> Self {
        Self {
            cache_size: 1024,
            max_retries: 2,
            retry_delay_ms: 100,
        }
    }
}
