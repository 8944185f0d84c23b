//! # Tracklet
//!
//! A Rust-native map bootstrapper with vehicle-track playback, inspired by
//! Leaflet and its playback plugin.
//!
//! The crate provides the map primitives (viewport, layers, tile sources),
//! a typed GeoJSON vehicle-track feed client, and a playback overlay that
//! replays time-stamped positions over the map.

pub mod bootstrap;
pub mod core;
pub mod data;
pub mod layers;
pub mod playback;
pub mod prelude;
pub mod tiles;
pub mod traits;

// Re-export public API
pub use crate::core::{
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{Map, MapOptions},
    viewport::Viewport,
};

pub use layers::{base::LayerTrait, manager::LayerManager, tile::TileLayer};

pub use data::{
    client::{FeedSource, HttpFeedSource},
    feed::{TrackFeature, TrackFeed, TrackGeometry},
};

pub use playback::{
    clock::PlaybackClock, options::PlaybackOptions, overlay::PlaybackOverlay, track::Track,
};

pub use bootstrap::{BootstrapConfig, Bootstrapper};

pub use tiles::source::{TileSource, UrlTemplateSource};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Bootstrap error: {0}")]
    Bootstrap(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = MapError;
