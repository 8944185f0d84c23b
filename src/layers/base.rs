use crate::{core::geo::LatLngBounds, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Tile,
    Playback,
    Custom,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Tile => write!(f, "tile"),
            LayerType::Playback => write!(f, "playback"),
            LayerType::Custom => write!(f, "custom"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    pub z_index: i32,
    pub opacity: f32,
    pub visible: bool,
}

impl LayerProperties {
    pub fn new(id: String, name: String, layer_type: LayerType) -> Self {
        Self {
            id,
            name,
            layer_type,
            z_index: 0,
            opacity: 1.0,
            visible: true,
        }
    }
}

/// Common interface for all map layers.
///
/// Rendering is delegated to the host: layers keep their own state current
/// through `update` and the host reads it back out (tile bytes, marker
/// positions) when drawing a frame.
pub trait LayerTrait: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn layer_type(&self) -> LayerType;

    fn z_index(&self) -> i32;

    fn set_z_index(&mut self, z_index: i32);

    fn opacity(&self) -> f32;

    fn set_opacity(&mut self, opacity: f32);

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    /// Advance layer state by `delta_ms` milliseconds.
    fn update(&mut self, _delta_ms: f64) -> Result<()> {
        Ok(())
    }

    /// Geographic extent of the layer's content, if it has one.
    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }

    fn options(&self) -> serde_json::Value;

    fn set_options(&mut self, options: serde_json::Value) -> Result<()>;

    /// Dynamic casting support
    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_properties() {
        let props = LayerProperties::new(
            "overlay".to_string(),
            "Playback".to_string(),
            LayerType::Playback,
        );

        assert_eq!(props.id, "overlay");
        assert_eq!(props.z_index, 0);
        assert_eq!(props.opacity, 1.0);
        assert!(props.visible);
    }

    #[test]
    fn test_layer_type_display() {
        assert_eq!(LayerType::Tile.to_string(), "tile");
        assert_eq!(LayerType::Playback.to_string(), "playback");
        assert_eq!(LayerType::Custom.to_string(), "custom");
    }
}
