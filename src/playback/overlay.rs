use crate::core::geo::{LatLng, LatLngBounds};
use crate::data::feed::{TrackFeature, TrackFeed};
use crate::layers::base::{LayerProperties, LayerTrait, LayerType};
use crate::playback::clock::PlaybackClock;
use crate::playback::options::PlaybackOptions;
use crate::playback::track::Track;
use crate::Result;

/// Visual style for a vehicle marker, resolved per feature.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub color: [u8; 3],
    pub radius: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: [0x1e, 0x90, 0xff],
            radius: 6.0,
        }
    }
}

/// Resolves a style for a feed feature; `None` uses the default style for
/// every vehicle.
pub type StyleFn = Box<dyn Fn(&TrackFeature) -> MarkerStyle + Send + Sync>;

/// Layer that replays a vehicle-track feed over the map.
///
/// The overlay holds the feed payload verbatim alongside the parsed tracks,
/// so callers can always get back exactly what the endpoint returned. When
/// playing, each `update` advances the shared clock and recomputes every
/// vehicle's interpolated position.
pub struct PlaybackOverlay {
    properties: LayerProperties,
    data: TrackFeed,
    tracks: Vec<Track>,
    clock: PlaybackClock,
    options: PlaybackOptions,
    style: Option<StyleFn>,
    playing: bool,
    positions: Vec<Option<LatLng>>,
}

impl PlaybackOverlay {
    /// Builds an overlay from a feed payload. Fails if any feature's
    /// coordinates and timestamps disagree in length or are unsorted.
    pub fn new(
        id: impl Into<String>,
        data: TrackFeed,
        style: Option<StyleFn>,
        options: PlaybackOptions,
    ) -> Result<Self> {
        let tracks: Vec<Track> = data
            .features()
            .iter()
            .map(Track::from_feature)
            .collect::<Result<_>>()?;

        let start = tracks.iter().filter_map(Track::start_time).min();
        let end = tracks.iter().filter_map(Track::end_time).max();
        let clock = match (start, end) {
            (Some(start), Some(end)) => {
                PlaybackClock::new(start, end, options.tick_len_ms, options.speed)
            }
            _ => PlaybackClock::empty(),
        };

        let positions = vec![None; tracks.len()];
        let properties =
            LayerProperties::new(id.into(), "Playback".to_string(), LayerType::Playback);

        let mut overlay = Self {
            properties,
            data,
            tracks,
            clock,
            options,
            style,
            playing: false,
            positions,
        };
        overlay.refresh_positions();
        Ok(overlay)
    }

    /// Starts playback. Calling it again while playing is a no-op.
    pub fn start(&mut self) {
        if self.playing {
            return;
        }
        self.playing = true;
        log::info!(
            "playback started: {} tracks over [{}, {}]",
            self.tracks.len(),
            self.clock.start(),
            self.clock.end()
        );
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// The feed payload exactly as it was handed in.
    pub fn data(&self) -> &TrackFeed {
        &self.data
    }

    pub fn playback_options(&self) -> &PlaybackOptions {
        &self.options
    }

    /// Current interpolated position per track. `None` for vehicles whose
    /// track hasn't started yet at the current cursor.
    pub fn current_positions(&self) -> &[Option<LatLng>] {
        &self.positions
    }

    /// Playback cursor in epoch milliseconds.
    pub fn current_time(&self) -> i64 {
        self.clock.cursor()
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn progress(&self) -> f64 {
        self.clock.progress()
    }

    /// Jumps the cursor to `t` and refreshes positions.
    pub fn seek(&mut self, t: i64) {
        self.clock.seek(t);
        self.refresh_positions();
    }

    pub fn style_for(&self, feature: &TrackFeature) -> MarkerStyle {
        match &self.style {
            Some(style) => style(feature),
            None => MarkerStyle::default(),
        }
    }

    fn refresh_positions(&mut self) {
        let t = self.clock.cursor();
        for (slot, track) in self.positions.iter_mut().zip(&self.tracks) {
            *slot = track.position_at(t);
        }
    }
}

impl LayerTrait for PlaybackOverlay {
    crate::impl_layer_trait!(PlaybackOverlay, properties);

    fn update(&mut self, delta_ms: f64) -> Result<()> {
        if !self.playing {
            return Ok(());
        }
        self.clock.advance(delta_ms);
        self.refresh_positions();
        if self.clock.at_end() {
            log::debug!("playback reached end of track range");
            self.playing = false;
        }
        Ok(())
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        let mut all: Option<LatLngBounds> = None;
        for track in &self.tracks {
            if let Some(track_bounds) = track.bounds() {
                match &mut all {
                    Some(bounds) => {
                        bounds.extend(&track_bounds.south_west);
                        bounds.extend(&track_bounds.north_east);
                    }
                    None => all = Some(track_bounds),
                }
            }
        }
        all
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "play_control": self.options.play_control,
            "date_control": self.options.date_control,
            "slider_control": self.options.slider_control,
            "tick_len_ms": self.options.tick_len_ms,
            "speed": self.options.speed,
        })
    }

    /// Only timing can be adjusted after construction; the control flags
    /// are fixed for the overlay's lifetime.
    fn set_options(&mut self, options: serde_json::Value) -> Result<()> {
        if let Some(tick_len_ms) = options.get("tick_len_ms").and_then(|v| v.as_u64()) {
            self.options.tick_len_ms = tick_len_ms;
            self.clock.set_tick_len(tick_len_ms);
        }
        if let Some(speed) = options.get("speed").and_then(|v| v.as_f64()) {
            self.options.speed = speed;
            self.clock.set_speed(speed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::feed::{TrackGeometry, TrackProperties};

    fn feed_with_one_track() -> TrackFeed {
        TrackFeed::FeatureCollection {
            features: vec![TrackFeature {
                id: None,
                geometry: TrackGeometry::MultiPoint(vec![
                    [-122.434762, 37.757921],
                    [-122.430000, 37.760000],
                ]),
                properties: TrackProperties {
                    time: vec![0, 1000],
                    ..Default::default()
                },
            }],
        }
    }

    #[test]
    fn test_new_parses_tracks_and_keeps_payload() {
        let feed = feed_with_one_track();
        let overlay =
            PlaybackOverlay::new("playback", feed.clone(), None, PlaybackOptions::default())
                .unwrap();

        assert_eq!(overlay.track_count(), 1);
        assert_eq!(overlay.data(), &feed);
        assert!(!overlay.is_playing());
    }

    #[test]
    fn test_update_advances_positions_while_playing() {
        let mut overlay = PlaybackOverlay::new(
            "playback",
            feed_with_one_track(),
            None,
            PlaybackOptions {
                tick_len_ms: 250,
                speed: 1.0,
                ..Default::default()
            },
        )
        .unwrap();

        overlay.start();
        assert!(overlay.is_playing());

        let start_pos = overlay.current_positions()[0].unwrap();
        overlay.update(500.0).unwrap();
        let mid_pos = overlay.current_positions()[0].unwrap();

        assert_eq!(overlay.current_time(), 500);
        assert!(mid_pos.lat > start_pos.lat);
    }

    #[test]
    fn test_stops_at_end_of_range() {
        let mut overlay = PlaybackOverlay::new(
            "playback",
            feed_with_one_track(),
            None,
            PlaybackOptions::default(),
        )
        .unwrap();

        overlay.start();
        overlay.update(10_000.0).unwrap();

        assert!(!overlay.is_playing());
        assert_eq!(overlay.current_time(), 1000);
        assert_eq!(overlay.progress(), 1.0);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut overlay = PlaybackOverlay::new(
            "playback",
            feed_with_one_track(),
            None,
            PlaybackOptions::default(),
        )
        .unwrap();

        overlay.start();
        overlay.start();
        assert!(overlay.is_playing());
    }

    #[test]
    fn test_empty_feed_builds_with_no_tracks() {
        let overlay = PlaybackOverlay::new(
            "playback",
            TrackFeed::empty(),
            None,
            PlaybackOptions::all_controls(),
        )
        .unwrap();

        assert_eq!(overlay.track_count(), 0);
        assert!(overlay.bounds().is_none());
    }

    #[test]
    fn test_rejects_invalid_feature() {
        let feed = TrackFeed::FeatureCollection {
            features: vec![TrackFeature {
                id: None,
                geometry: TrackGeometry::Point([-122.4, 37.75]),
                properties: TrackProperties {
                    time: vec![0, 1000],
                    ..Default::default()
                },
            }],
        };

        assert!(PlaybackOverlay::new("playback", feed, None, PlaybackOptions::default()).is_err());
    }

    #[test]
    fn test_custom_style_fn() {
        let style: StyleFn = Box::new(|_| MarkerStyle {
            color: [255, 0, 0],
            radius: 10.0,
        });
        let feed = feed_with_one_track();
        let overlay =
            PlaybackOverlay::new("playback", feed.clone(), Some(style), PlaybackOptions::default())
                .unwrap();

        let resolved = overlay.style_for(&feed.features()[0]);
        assert_eq!(resolved.color, [255, 0, 0]);
    }

    #[test]
    fn test_seek_refreshes_positions() {
        let mut overlay = PlaybackOverlay::new(
            "playback",
            feed_with_one_track(),
            None,
            PlaybackOptions::default(),
        )
        .unwrap();

        overlay.seek(1000);
        let pos = overlay.current_positions()[0].unwrap();
        assert!((pos.lat - 37.76).abs() < 1e-9);
    }
}
