use crate::core::geo::{LatLng, LatLngBounds, Point};
use serde::{Deserialize, Serialize};

const EARTH_RADIUS: f64 = 6378137.0;

/// The current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, 18.0),
            size,
            min_zoom: 0.0,
            max_zoom: 18.0,
        }
    }

    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(
            LatLng::clamp_lat(center.lat),
            center.lng.clamp(-180.0, 180.0),
        );
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Projects a coordinate to world pixel coordinates at the given zoom
    /// level (Web Mercator, EPSG:3857).
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let z = zoom.unwrap_or(self.zoom);
        let scale = 256.0 * 2_f64.powf(z);
        let world = 2.0 * std::f64::consts::PI * EARTH_RADIUS;

        let x = lat_lng.lng.to_radians() * EARTH_RADIUS;
        let y = ((std::f64::consts::PI / 4.0 + lat_lng.lat.to_radians() / 2.0)
            .tan()
            .ln())
            * EARTH_RADIUS;

        let pixel_x = (x + world / 2.0) / world * scale;
        let pixel_y = (-y + world / 2.0) / world * scale;

        Point::new(pixel_x, pixel_y)
    }

    /// Unprojects world pixel coordinates back to a geographic coordinate.
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let z = zoom.unwrap_or(self.zoom);
        let scale = 256.0 * 2_f64.powf(z);
        let world = 2.0 * std::f64::consts::PI * EARTH_RADIUS;

        let x = pixel.x / scale * world - world / 2.0;
        let y = world / 2.0 - pixel.y / scale * world;

        let lng = (x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - std::f64::consts::PI / 2.0)
            .to_degrees();

        LatLng::new(lat, lng)
    }

    /// The geographic bounds currently covered by the viewport
    pub fn bounds(&self) -> LatLngBounds {
        let center_px = self.project(&self.center, None);
        let half = Point::new(self.size.x / 2.0, self.size.y / 2.0);

        let nw = self.unproject(&center_px.subtract(&half), None);
        let se = self.unproject(&center_px.add(&half), None);

        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_creation() {
        let viewport = Viewport::new(
            LatLng::new(37.757921, -122.434762),
            13.0,
            Point::new(800.0, 600.0),
        );

        assert_eq!(viewport.zoom, 13.0);
        assert_eq!(viewport.center.lat, 37.757921);
        assert_eq!(viewport.size.x, 800.0);
    }

    #[test]
    fn test_projection_round_trip() {
        let viewport = Viewport::default();
        let coord = LatLng::new(37.757921, -122.434762);

        let projected = viewport.project(&coord, Some(13.0));
        let back = viewport.unproject(&projected, Some(13.0));

        assert!((back.lat - coord.lat).abs() < 1e-6);
        assert!((back.lng - coord.lng).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_limits() {
        let mut viewport = Viewport::default();
        viewport.set_zoom_limits(2.0, 15.0);

        viewport.set_zoom(1.0);
        assert_eq!(viewport.zoom, 2.0);

        viewport.set_zoom(20.0);
        assert_eq!(viewport.zoom, 15.0);
    }

    #[test]
    fn test_bounds_cover_center() {
        let viewport = Viewport::new(
            LatLng::new(37.757921, -122.434762),
            13.0,
            Point::new(800.0, 600.0),
        );

        let bounds = viewport.bounds();
        assert!(bounds.contains(&viewport.center));
    }
}
