//! Prelude module for common tracklet types and traits
//!
//! Re-exports the most commonly used types for easy importing with
//! `use tracklet::prelude::*;`

pub use crate::core::{
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{Map, MapOptions},
    viewport::Viewport,
};

pub use crate::layers::{base::LayerTrait, manager::LayerManager, tile::TileLayer};

pub use crate::data::{
    client::{FeedSource, HttpFeedSource},
    feed::{TrackFeature, TrackFeed, TrackGeometry},
};

pub use crate::playback::{
    clock::PlaybackClock, options::PlaybackOptions, overlay::PlaybackOverlay, track::Track,
};

pub use crate::bootstrap::{BootstrapConfig, Bootstrapper};

pub use crate::tiles::{
    cache::TileCache,
    loader::TileLoader,
    source::{TileSource, UrlTemplateSource},
};

pub use crate::{Error as MapError, Result};

pub use std::{
    sync::Arc,
    time::{Duration, Instant},
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
