use crate::{layers::base::LayerTrait, prelude::HashMap, Result};

/// Holds the map's layers and keeps them ordered by z-index.
pub struct LayerManager {
    /// All layers indexed by ID
    layers: HashMap<String, Box<dyn LayerTrait>>,
    /// Layer IDs sorted by z-index, lowest first
    render_order: Vec<String>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            render_order: Vec::new(),
        }
    }

    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let layer_id = layer.id().to_string();
        if self.layers.contains_key(&layer_id) {
            return Err(crate::Error::Layer(format!("duplicate layer id {}", layer_id)).into());
        }

        let z_index = layer.z_index();
        self.layers.insert(layer_id.clone(), layer);

        let insert_pos = self
            .render_order
            .iter()
            .position(|id| {
                self.layers
                    .get(id)
                    .map(|l| l.z_index() > z_index)
                    .unwrap_or(false)
            })
            .unwrap_or(self.render_order.len());

        self.render_order.insert(insert_pos, layer_id);
        Ok(())
    }

    pub fn remove_layer(&mut self, layer_id: &str) -> Result<Option<Box<dyn LayerTrait>>> {
        self.render_order.retain(|id| id != layer_id);
        Ok(self.layers.remove(layer_id))
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layers.get(layer_id).map(|l| l.as_ref())
    }

    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layers.get_mut(layer_id).map(|layer| f(layer.as_mut()))
    }

    pub fn list_layers(&self) -> Vec<String> {
        self.render_order.clone()
    }

    /// Applies a function to each layer mutably in render order
    pub fn for_each_layer_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut dyn LayerTrait),
    {
        for id in self.render_order.clone() {
            if let Some(layer) = self.layers.get_mut(&id) {
                f(layer.as_mut());
            }
        }
    }

    /// Applies a function to each layer immutably in render order
    pub fn for_each_layer<F>(&self, mut f: F)
    where
        F: FnMut(&dyn LayerTrait),
    {
        for id in &self.render_order {
            if let Some(layer) = self.layers.get(id) {
                f(layer.as_ref());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::base::{LayerProperties, LayerType};

    struct StubLayer {
        properties: LayerProperties,
    }

    impl StubLayer {
        fn new(id: &str, z_index: i32) -> Self {
            let mut properties =
                LayerProperties::new(id.to_string(), id.to_string(), LayerType::Custom);
            properties.z_index = z_index;
            Self { properties }
        }
    }

    impl LayerTrait for StubLayer {
        crate::impl_layer_trait!(StubLayer, properties);

        fn options(&self) -> serde_json::Value {
            serde_json::Value::Null
        }

        fn set_options(&mut self, _options: serde_json::Value) -> crate::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_layers_ordered_by_z_index() {
        let mut manager = LayerManager::new();
        manager.add_layer(Box::new(StubLayer::new("overlay", 10))).unwrap();
        manager.add_layer(Box::new(StubLayer::new("basemap", 0))).unwrap();

        assert_eq!(manager.list_layers(), vec!["basemap", "overlay"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut manager = LayerManager::new();
        manager.add_layer(Box::new(StubLayer::new("basemap", 0))).unwrap();
        assert!(manager.add_layer(Box::new(StubLayer::new("basemap", 1))).is_err());
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_remove_layer() {
        let mut manager = LayerManager::new();
        manager.add_layer(Box::new(StubLayer::new("basemap", 0))).unwrap();

        let removed = manager.remove_layer("basemap").unwrap();
        assert!(removed.is_some());
        assert!(manager.is_empty());
    }
}
