use super::{Layer, ModelError, NormalLayer, TemporaryLayer};
use crate::{geom::Size, observer::DocumentObserver};

/// One page: an ordered stack of layers (bottom first), plus the temporary layer for fading
/// strokes which is never saved and never appears in [`Page::layers`].
#[derive(Clone, Debug)]
pub struct Page {
    size: Size,
    layers: Vec<Layer>,
    temporary: TemporaryLayer,
}
impl Page {
    /// A page with a single empty drawing layer.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            layers: vec![Layer::Normal(NormalLayer::new())],
            temporary: TemporaryLayer::default(),
        }
    }
    /// A page with no layers at all. For loaders and importers.
    #[must_use]
    pub fn empty(size: Size) -> Self {
        Self {
            size,
            layers: Vec::new(),
            temporary: TemporaryLayer::default(),
        }
    }
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
    #[must_use]
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
    #[must_use]
    pub fn temporary(&self) -> &TemporaryLayer {
        &self.temporary
    }
    /// Append a layer without notifying anyone. For building a page during load.
    pub fn push_layer(&mut self, layer: impl Into<Layer>) {
        self.layers.push(layer.into());
    }
    /// Builder-style [`Self::push_layer`].
    #[must_use]
    pub fn with_layer(mut self, layer: impl Into<Layer>) -> Self {
        self.push_layer(layer);
        self
    }
    pub(crate) fn layer_mut(&mut self, index: usize) -> Result<&mut Layer, ModelError> {
        let len = self.layers.len();
        self.layers
            .get_mut(index)
            .ok_or(ModelError::OutOfRange { index, len })
    }
    pub(crate) fn temporary_mut(&mut self) -> &mut TemporaryLayer {
        &mut self.temporary
    }
    pub(crate) fn add_layer(
        &mut self,
        page: usize,
        index: usize,
        layer: Layer,
        observer: &mut dyn DocumentObserver,
    ) -> Result<(), ModelError> {
        ModelError::check_insert(index, self.layers.len())?;
        self.layers.insert(index, layer);
        observer.layer_added(page, index, &self.layers[index]);
        Ok(())
    }
    pub(crate) fn delete_layer(
        &mut self,
        page: usize,
        index: usize,
        observer: &mut dyn DocumentObserver,
    ) -> Result<Layer, ModelError> {
        ModelError::check_index(index, self.layers.len())?;
        let layer = self.layers.remove(index);
        observer.layer_deleted(page, index);
        Ok(layer)
    }
}
/// Compares the persistent content - fading strokes are not part of a page's identity.
impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.layers == other.layers
    }
}
impl Eq for Page {}
