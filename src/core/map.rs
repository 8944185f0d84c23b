use crate::{
    core::{geo::LatLng, viewport::Viewport},
    layers::{base::LayerTrait, manager::LayerManager},
    Result,
};

/// Interaction and constraint options for a map view
#[derive(Debug, Clone)]
pub struct MapOptions {
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            min_zoom: None,
            max_zoom: None,
        }
    }
}

/// The map view: a viewport plus the stack of layers rendered into it.
///
/// The map itself is renderer-agnostic; layers expose their state (loaded
/// tiles, marker positions) and a host renderer draws them.
pub struct Map {
    pub viewport: Viewport,
    layer_manager: LayerManager,
    options: MapOptions,
}

impl std::fmt::Debug for Map {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Map")
            .field("viewport", &self.viewport)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Map {
    pub fn new(center: LatLng, zoom: f64, size: crate::core::geo::Point) -> Self {
        Self::with_options(Viewport::new(center, zoom, size), MapOptions::default())
    }

    pub fn with_options(viewport: Viewport, options: MapOptions) -> Self {
        let mut map = Self {
            viewport,
            layer_manager: LayerManager::new(),
            options,
        };

        if let (Some(min), Some(max)) = (map.options.min_zoom, map.options.max_zoom) {
            map.viewport.set_zoom_limits(min, max);
        }

        map
    }

    /// Moves the view to a new center and zoom level.
    pub fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()> {
        if !center.is_valid() {
            return Err(crate::Error::InvalidCoordinates(format!(
                "({}, {})",
                center.lat, center.lng
            ))
            .into());
        }

        self.viewport.set_center(center);
        self.viewport.set_zoom(zoom);
        Ok(())
    }

    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        self.layer_manager.add_layer(layer)
    }

    pub fn remove_layer(&mut self, layer_id: &str) -> Result<Option<Box<dyn LayerTrait>>> {
        self.layer_manager.remove_layer(layer_id)
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layer_manager.get_layer(layer_id)
    }

    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layer_manager.with_layer_mut(layer_id, f)
    }

    pub fn list_layers(&self) -> Vec<String> {
        self.layer_manager.list_layers()
    }

    pub fn layer_count(&self) -> usize {
        self.layer_manager.len()
    }

    /// Advances all layers by `delta_ms` milliseconds of wall time.
    pub fn update(&mut self, delta_ms: f64) -> Result<()> {
        let mut result = Ok(());
        self.layer_manager.for_each_layer_mut(|layer| {
            if let Err(e) = layer.update(delta_ms) {
                log::warn!("layer {} update failed: {}", layer.id(), e);
                if result.is_ok() {
                    result = Err(e);
                }
            }
        });
        result
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }
}
