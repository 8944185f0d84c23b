//! Typed representation of the vehicle track feed.
//!
//! The feed is a GeoJSON `FeatureCollection` whose features carry a
//! `properties.time` array of epoch-millisecond timestamps, one per
//! coordinate, so each feature describes a timestamped track rather than a
//! static shape.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A complete feed payload as returned by the track endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TrackFeed {
    FeatureCollection { features: Vec<TrackFeature> },
}

impl TrackFeed {
    /// Parses a feed from raw JSON text.
    pub fn from_json(raw: &str) -> Result<Self> {
        let feed: TrackFeed = serde_json::from_str(raw)?;
        Ok(feed)
    }

    /// Builds an empty collection; useful as a placeholder before data
    /// arrives.
    pub fn empty() -> Self {
        TrackFeed::FeatureCollection {
            features: Vec::new(),
        }
    }

    pub fn features(&self) -> &[TrackFeature] {
        match self {
            TrackFeed::FeatureCollection { features } => features,
        }
    }

    pub fn len(&self) -> usize {
        self.features().len()
    }

    pub fn is_empty(&self) -> bool {
        self.features().is_empty()
    }

    /// Checks that every feature carries one timestamp per coordinate.
    pub fn validate(&self) -> Result<()> {
        for (i, feature) in self.features().iter().enumerate() {
            let coords = feature.geometry.coordinate_count();
            let times = feature.properties.time.len();
            if coords != times {
                return Err(Error::ParseError(format!(
                    "feature {}: {} coordinates but {} timestamps",
                    i, coords, times
                ))
                .into());
            }
        }
        Ok(())
    }
}

/// A single vehicle track within the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackFeature {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub geometry: TrackGeometry,
    #[serde(default)]
    pub properties: TrackProperties,
}

/// Geometry variants the feed produces. Vehicles with a single ping come
/// through as `Point`; everything else is `MultiPoint` or `LineString` with
/// coordinates parallel to `properties.time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum TrackGeometry {
    MultiPoint(Vec<[f64; 2]>),
    LineString(Vec<[f64; 2]>),
    Point([f64; 2]),
}

impl TrackGeometry {
    /// Coordinates in `[lng, lat]` order, as GeoJSON stores them.
    pub fn coordinates(&self) -> Vec<[f64; 2]> {
        match self {
            TrackGeometry::MultiPoint(coords) | TrackGeometry::LineString(coords) => {
                coords.clone()
            }
            TrackGeometry::Point(coord) => vec![*coord],
        }
    }

    pub fn coordinate_count(&self) -> usize {
        match self {
            TrackGeometry::MultiPoint(coords) | TrackGeometry::LineString(coords) => coords.len(),
            TrackGeometry::Point(_) => 1,
        }
    }
}

/// Feature properties. Only `time` is interpreted; everything else is kept
/// verbatim so the payload round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackProperties {
    #[serde(default)]
    pub time: Vec<i64>,
    #[serde(flatten)]
    pub extra: std::collections::HashMap<String, serde_json::Value>,
}
