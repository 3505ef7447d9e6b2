//! Fetching the earthquake feed and the plate boundaries
//!
//! Both documents are loaded concurrently and joined before the map is
//! assembled. Each load fails on its own: a failure is logged and the
//! corresponding overlay is left out.

use crate::{
    core::config::FeedConfig,
    data::{geojson::GeoJson, quake::QuakeFeed},
    Result,
};
use std::path::PathBuf;

/// Where a GeoJSON document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Url(String),
    Path(PathBuf),
}

impl FeedSource {
    /// `http(s)://` locations are URLs, everything else is a local path
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            FeedSource::Url(location.to_string())
        } else {
            FeedSource::Path(PathBuf::from(location.trim_start_matches("file://")))
        }
    }
}

impl std::fmt::Display for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedSource::Url(url) => f.write_str(url),
            FeedSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Result of the joined load; `None` marks a document that failed or was not requested
#[derive(Debug, Clone, Default)]
pub struct LoadedFeeds {
    pub earthquakes: Option<QuakeFeed>,
    pub plates: Option<GeoJson>,
}

pub struct FeedLoader {
    client: reqwest::Client,
    config: FeedConfig,
}

impl FeedLoader {
    pub fn new(config: FeedConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Reads a GeoJSON document from a URL or a local file
    pub async fn fetch_geojson(&self, source: &FeedSource) -> Result<GeoJson> {
        log::info!("loading {}", source);
        let bytes = match source {
            FeedSource::Url(url) => self
                .client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?
                .to_vec(),
            FeedSource::Path(path) => tokio::fs::read(path).await?,
        };
        GeoJson::from_slice(&bytes)
    }

    pub async fn fetch_earthquakes(&self) -> Result<QuakeFeed> {
        let source = FeedSource::parse(&self.config.earthquakes_url);
        let feed = QuakeFeed::from_geojson(&self.fetch_geojson(&source).await?);
        log::info!("loaded {} earthquakes", feed.len());
        Ok(feed)
    }

    /// `Ok(None)` when no plates source is configured
    pub async fn fetch_plates(&self) -> Result<Option<GeoJson>> {
        match &self.config.plates_source {
            Some(location) => {
                let plates = self.fetch_geojson(&FeedSource::parse(location)).await?;
                log::info!("loaded {} plate boundary features", plates.features().len());
                Ok(Some(plates))
            }
            None => Ok(None),
        }
    }

    /// Runs both loads concurrently and waits for both
    pub async fn load_all(&self) -> LoadedFeeds {
        let (earthquakes, plates) = tokio::join!(self.fetch_earthquakes(), self.fetch_plates());

        let earthquakes = earthquakes
            .map_err(|e| log::error!("earthquake feed unavailable: {}", e))
            .ok();
        let plates = plates
            .map_err(|e| log::error!("plate boundaries unavailable: {}", e))
            .ok()
            .flatten();

        LoadedFeeds { earthquakes, plates }
    }
}
