//! Startup wiring: builds the map, attaches the basemap, then fetches the
//! vehicle feed and starts playback over it.

use crate::core::geo::{LatLng, Point};
use crate::core::map::Map;
use crate::data::client::FeedSource;
use crate::layers::base::LayerTrait;
use crate::layers::tile::TileLayer;
use crate::playback::options::PlaybackOptions;
use crate::playback::overlay::{PlaybackOverlay, StyleFn};
use crate::tiles::source::UrlTemplateSource;
use crate::{Error, Result};

/// Default view: the Mission district in San Francisco, where the original
/// muni feed this was built for lives.
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 37.757921,
    lng: -122.434762,
};
pub const DEFAULT_ZOOM: f64 = 13.0;
pub const DEFAULT_TILE_TEMPLATE: &str =
    "http://{s}.tiles.mapbox.com/v3/github.map-xgq2svrz/{z}/{x}/{y}.png";
pub const DEFAULT_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

pub const BASEMAP_LAYER_ID: &str = "basemap";
pub const PLAYBACK_LAYER_ID: &str = "playback";

/// Everything the bootstrapper needs to stand up a map.
pub struct BootstrapConfig {
    pub center: LatLng,
    pub zoom: f64,
    pub viewport_size: Point,
    pub tile_template: String,
    pub subdomains: Vec<String>,
    pub playback: PlaybackOptions,
    /// Optional per-vehicle marker style for the playback overlay.
    pub style: Option<StyleFn>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            viewport_size: Point::new(800.0, 600.0),
            tile_template: DEFAULT_TILE_TEMPLATE.to_string(),
            subdomains: DEFAULT_SUBDOMAINS.iter().map(|s| s.to_string()).collect(),
            playback: PlaybackOptions::all_controls(),
            style: None,
        }
    }
}

/// Stands up a map with a basemap and a playback overlay fed from a track
/// endpoint.
///
/// `initialize` and `load_and_start_playback` are the two explicit phases;
/// `run` chains them the way the original page did, where a feed that fails
/// to load leaves a working map with no overlay.
pub struct Bootstrapper {
    config: BootstrapConfig,
    feed: Box<dyn FeedSource>,
    map: Option<Map>,
}

impl Bootstrapper {
    pub fn new(feed: Box<dyn FeedSource>) -> Self {
        Self::with_config(feed, BootstrapConfig::default())
    }

    pub fn with_config(feed: Box<dyn FeedSource>, config: BootstrapConfig) -> Self {
        Self {
            config,
            feed,
            map: None,
        }
    }

    /// Creates the map and attaches the basemap tile layer. Calling this a
    /// second time is an error; the map is already live.
    pub fn initialize(&mut self) -> Result<&mut Map> {
        if self.map.is_some() {
            return Err(Error::Bootstrap("map is already initialized".to_string()).into());
        }
        if !self.config.center.is_valid() {
            return Err(Error::InvalidCoordinates(format!(
                "({}, {})",
                self.config.center.lat, self.config.center.lng
            ))
            .into());
        }

        log::info!(
            "initializing map at ({}, {}) zoom {}",
            self.config.center.lat,
            self.config.center.lng,
            self.config.zoom
        );

        let mut map = Map::new(self.config.center, self.config.zoom, self.config.viewport_size);

        let subdomains: Vec<&str> = self.config.subdomains.iter().map(String::as_str).collect();
        let source = UrlTemplateSource::new(&self.config.tile_template, &subdomains);
        let basemap = TileLayer::new(
            BASEMAP_LAYER_ID.to_string(),
            "Basemap".to_string(),
            source,
        );
        map.add_layer(Box::new(basemap))?;

        Ok(self.map.insert(map))
    }

    /// Fetches the track feed, builds the playback overlay from it, starts
    /// playback, and attaches the overlay to the map. Fails if the map is
    /// not initialized, the fetch fails, or the payload is malformed.
    pub async fn load_and_start_playback(&mut self) -> Result<()> {
        if self.map.is_none() {
            return Err(Error::Bootstrap(
                "map must be initialized before loading playback".to_string(),
            )
            .into());
        }

        let feed = self.feed.fetch().await?;
        log::info!("track feed loaded: {} features", feed.len());

        let style = self.config.style.take();

        let mut overlay = PlaybackOverlay::new(
            PLAYBACK_LAYER_ID,
            feed,
            style,
            self.config.playback.clone(),
        )?;
        overlay.start();

        let map = self
            .map
            .as_mut()
            .ok_or_else(|| Error::Bootstrap("map went away during bootstrap".to_string()))?;
        map.add_layer(Box::new(overlay))
    }

    /// Full startup sequence. The map comes up unconditionally; a feed that
    /// cannot be loaded is logged and absorbed so the basemap still shows,
    /// matching how a missing overlay is preferable to no map at all.
    pub async fn run(&mut self) -> Result<()> {
        self.initialize()?;
        if let Err(e) = self.load_and_start_playback().await {
            log::warn!("track feed unavailable, continuing without playback: {}", e);
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.map.is_some()
    }

    pub fn map(&self) -> Option<&Map> {
        self.map.as_ref()
    }

    pub fn map_mut(&mut self) -> Option<&mut Map> {
        self.map.as_mut()
    }

    /// The playback overlay, if the feed loaded.
    pub fn playback(&self) -> Option<&PlaybackOverlay> {
        self.map
            .as_ref()?
            .get_layer(PLAYBACK_LAYER_ID)?
            .as_any()
            .downcast_ref::<PlaybackOverlay>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::feed::TrackFeed;
    use async_trait::async_trait;

    struct EmptyFeed;

    #[async_trait]
    impl FeedSource for EmptyFeed {
        async fn fetch(&self) -> Result<TrackFeed> {
            Ok(TrackFeed::empty())
        }
    }

    #[test]
    fn test_initialize_sets_view_and_basemap() {
        let mut boot = Bootstrapper::new(Box::new(EmptyFeed));
        boot.initialize().unwrap();

        let map = boot.map().unwrap();
        assert_eq!(map.viewport.center, DEFAULT_CENTER);
        assert_eq!(map.viewport.zoom, DEFAULT_ZOOM);
        assert_eq!(map.list_layers(), vec![BASEMAP_LAYER_ID.to_string()]);
    }

    #[test]
    fn test_double_initialize_is_an_error() {
        let mut boot = Bootstrapper::new(Box::new(EmptyFeed));
        boot.initialize().unwrap();
        assert!(boot.initialize().is_err());
    }

    #[test]
    fn test_playback_requires_initialized_map() {
        let boot = Bootstrapper::new(Box::new(EmptyFeed));
        assert!(!boot.is_initialized());
        assert!(boot.playback().is_none());
    }
}
