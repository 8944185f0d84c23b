use crate::{
    core::{geo::TileCoord, viewport::Viewport},
    layers::base::{LayerProperties, LayerTrait, LayerType},
    prelude::HashSet,
    tiles::{cache::TileCache, loader::TileLoader, source::TileSource},
    Result,
};
use crossbeam_channel::Receiver;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct TileLayerOptions {
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub tile_size: u32,
    pub cache_capacity: usize,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            min_zoom: 0,
            max_zoom: 18,
            tile_size: 256,
            cache_capacity: 1024,
        }
    }
}

/// Background raster layer backed by a templated tile source.
///
/// Tiles are fetched on background tasks; `update` drains completed
/// downloads into the cache so the host renderer can read them back out.
pub struct TileLayer {
    properties: LayerProperties,
    options: TileLayerOptions,
    source: Arc<dyn TileSource>,
    cache: TileCache,
    loader: TileLoader,
    results: Receiver<(TileCoord, Vec<u8>)>,
    pending: HashSet<TileCoord>,
}

impl TileLayer {
    pub fn new(id: String, name: String, source: impl TileSource + 'static) -> Self {
        Self::with_options(id, name, source, TileLayerOptions::default())
    }

    pub fn with_options(
        id: String,
        name: String,
        source: impl TileSource + 'static,
        options: TileLayerOptions,
    ) -> Self {
        let properties = LayerProperties::new(id, name, LayerType::Tile);
        let (loader, results) = TileLoader::new();
        let cache = TileCache::new(options.cache_capacity);

        Self {
            properties,
            options,
            source: Arc::new(source),
            cache,
            loader,
            results,
            pending: HashSet::default(),
        }
    }

    /// Tile coordinates needed to cover the viewport at its current zoom.
    pub fn visible_tiles(&self, viewport: &Viewport) -> Vec<TileCoord> {
        let zoom = (viewport.zoom.floor() as u8).clamp(self.options.min_zoom, self.options.max_zoom);
        let bounds = viewport.bounds();

        let nw = TileCoord::from_lat_lng(
            &crate::core::geo::LatLng::new(bounds.north_east.lat, bounds.south_west.lng),
            zoom,
        );
        let se = TileCoord::from_lat_lng(
            &crate::core::geo::LatLng::new(bounds.south_west.lat, bounds.north_east.lng),
            zoom,
        );

        let mut coords = Vec::new();
        for y in nw.y..=se.y {
            for x in nw.x..=se.x {
                let coord = TileCoord::new(x, y, zoom);
                if coord.is_valid() {
                    coords.push(coord);
                }
            }
        }
        coords
    }

    /// Queues downloads for every visible tile that is neither cached nor
    /// already in flight. Must be called from within a tokio runtime.
    pub fn request_visible(&mut self, viewport: &Viewport) {
        for coord in self.visible_tiles(viewport) {
            if self.cache.contains(&coord) || self.pending.contains(&coord) {
                continue;
            }
            self.pending.insert(coord);
            self.loader.queue(&self.source, coord);
        }
    }

    /// Returns the raw bytes of a loaded tile, if present.
    pub fn tile(&self, coord: &TileCoord) -> Option<Arc<Vec<u8>>> {
        self.cache.get(coord)
    }

    pub fn loaded_tile_count(&self) -> usize {
        self.cache.len()
    }

    pub fn pending_tile_count(&self) -> usize {
        self.pending.len()
    }

    /// URL the layer would fetch for a coordinate; useful for diagnostics.
    pub fn tile_url(&self, coord: TileCoord) -> String {
        self.source.url(coord)
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(TileLayer, properties);

    fn update(&mut self, _delta_ms: f64) -> Result<()> {
        while let Ok((coord, data)) = self.results.try_recv() {
            self.pending.remove(&coord);
            self.cache.insert(coord, data);
        }
        Ok(())
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "min_zoom": self.options.min_zoom,
            "max_zoom": self.options.max_zoom,
            "tile_size": self.options.tile_size,
        })
    }

    fn set_options(&mut self, options: serde_json::Value) -> Result<()> {
        if let Some(min_zoom) = options.get("min_zoom").and_then(|v| v.as_u64()) {
            self.options.min_zoom = min_zoom as u8;
        }
        if let Some(max_zoom) = options.get("max_zoom").and_then(|v| v.as_u64()) {
            self.options.max_zoom = max_zoom as u8;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::{LatLng, Point};
    use crate::tiles::source::UrlTemplateSource;

    fn sf_viewport() -> Viewport {
        Viewport::new(
            LatLng::new(37.757921, -122.434762),
            13.0,
            Point::new(800.0, 600.0),
        )
    }

    #[test]
    fn test_visible_tiles_cover_viewport() {
        let layer = TileLayer::new(
            "basemap".to_string(),
            "Base".to_string(),
            UrlTemplateSource::openstreetmap(),
        );

        let tiles = layer.visible_tiles(&sf_viewport());
        assert!(!tiles.is_empty());
        assert!(tiles.iter().all(|t| t.z == 13));

        // The tile under the viewport center must be in the set
        let center_tile = TileCoord::from_lat_lng(&LatLng::new(37.757921, -122.434762), 13);
        assert!(tiles.contains(&center_tile));
    }

    #[test]
    fn test_layer_type_and_defaults() {
        let layer = TileLayer::new(
            "basemap".to_string(),
            "Base".to_string(),
            UrlTemplateSource::openstreetmap(),
        );

        assert_eq!(layer.layer_type(), LayerType::Tile);
        assert_eq!(layer.loaded_tile_count(), 0);
        assert_eq!(layer.pending_tile_count(), 0);
        assert!(layer.is_visible());
    }

    #[test]
    fn test_set_options_updates_zoom_range() {
        let mut layer = TileLayer::new(
            "basemap".to_string(),
            "Base".to_string(),
            UrlTemplateSource::openstreetmap(),
        );

        layer
            .set_options(serde_json::json!({"min_zoom": 5, "max_zoom": 12}))
            .unwrap();

        let opts = LayerTrait::options(&layer);
        assert_eq!(opts["min_zoom"], 5);
        assert_eq!(opts["max_zoom"], 12);
    }
}
