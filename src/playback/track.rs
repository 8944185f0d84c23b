use crate::core::geo::{LatLng, LatLngBounds};
use crate::data::feed::TrackFeature;
use crate::traits::Lerp;
use crate::{Error, Result};

/// A single vehicle's timestamped positions, ready for interpolation.
///
/// Built from a feed feature; coordinates are converted from GeoJSON
/// `[lng, lat]` order and paired with the feature's epoch-millisecond
/// timestamps.
#[derive(Debug, Clone)]
pub struct Track {
    positions: Vec<LatLng>,
    times: Vec<i64>,
}

impl Track {
    pub fn from_feature(feature: &TrackFeature) -> Result<Self> {
        let coords = feature.geometry.coordinates();
        let times = feature.properties.time.clone();

        if coords.len() != times.len() {
            return Err(Error::ParseError(format!(
                "track has {} coordinates but {} timestamps",
                coords.len(),
                times.len()
            ))
            .into());
        }
        if times.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::ParseError("track timestamps are not sorted".to_string()).into());
        }

        let positions = coords
            .iter()
            .map(|&[lng, lat]| LatLng::new(lat, lng))
            .collect();

        Ok(Self { positions, times })
    }

    /// Position at track time `t` (epoch ms). Returns `None` before the
    /// first sample; after the last sample the vehicle stays put at its
    /// final position. Between samples the position is interpolated
    /// linearly.
    pub fn position_at(&self, t: i64) -> Option<LatLng> {
        let first = *self.times.first()?;
        if t < first {
            return None;
        }
        let last = *self.times.last()?;
        if t >= last {
            return self.positions.last().copied();
        }

        // t is within [first, last); find the surrounding samples.
        let idx = match self.times.binary_search(&t) {
            Ok(i) => return self.positions.get(i).copied(),
            Err(i) => i,
        };

        let (t0, t1) = (self.times[idx - 1], self.times[idx]);
        let span = (t1 - t0) as f64;
        let frac = if span > 0.0 {
            (t - t0) as f64 / span
        } else {
            0.0
        };
        Some(self.positions[idx - 1].lerp(&self.positions[idx], frac))
    }

    pub fn start_time(&self) -> Option<i64> {
        self.times.first().copied()
    }

    pub fn end_time(&self) -> Option<i64> {
        self.times.last().copied()
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        let mut iter = self.positions.iter();
        let first = iter.next()?;
        let mut bounds = LatLngBounds::new(*first, *first);
        for pos in iter {
            bounds.extend(pos);
        }
        Some(bounds)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
