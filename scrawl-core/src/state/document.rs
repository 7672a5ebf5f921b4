use super::{EmbeddedResource, Layer, LayerPath, ModelError, NormalLayer, Page, ResourceID};
use crate::{observer::DocumentObserver, stroke::Stroke};
use std::time::{Duration, Instant};

/// Pages removed or inserted as a unit. Usually exactly one.
pub type Pages = smallvec::SmallVec<[Page; 1]>;

/// The root of the tree: ordered pages, plus the embedded documents their PDF layers show.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pages: Vec<Page>,
    resources: Vec<EmbeddedResource>,
}
// Queries
impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }
    #[must_use]
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }
    #[must_use]
    pub fn resources(&self) -> &[EmbeddedResource] {
        &self.resources
    }
    #[must_use]
    pub fn resource(&self, id: ResourceID) -> Option<&EmbeddedResource> {
        self.resources.iter().find(|resource| resource.id() == id)
    }
    #[must_use]
    pub fn resource_index(&self, id: ResourceID) -> Option<usize> {
        self.resources.iter().position(|resource| resource.id() == id)
    }
    /// Look up a layer that can hold strokes.
    pub fn normal_layer(&self, at: LayerPath) -> Result<&NormalLayer, ModelError> {
        let page = self.page_ref(at.page)?;
        ModelError::check_index(at.layer, page.layer_count())?;
        page.layers()[at.layer]
            .normal()
            .ok_or(ModelError::NotNormalLayer { index: at.layer })
    }
    /// The earliest fading-stroke deadline across every page.
    #[must_use]
    pub fn next_fading_deadline(&self) -> Option<Instant> {
        self.pages
            .iter()
            .filter_map(|page| page.temporary().next_deadline())
            .min()
    }
    fn page_ref(&self, index: usize) -> Result<&Page, ModelError> {
        let len = self.pages.len();
        self.pages.get(index).ok_or(ModelError::OutOfRange { index, len })
    }
    fn page_mut(&mut self, index: usize) -> Result<&mut Page, ModelError> {
        let len = self.pages.len();
        self.pages
            .get_mut(index)
            .ok_or(ModelError::OutOfRange { index, len })
    }
    fn normal_layer_mut(&mut self, at: LayerPath) -> Result<&mut NormalLayer, ModelError> {
        self.page_mut(at.page)?
            .layer_mut(at.layer)?
            .normal_mut()
            .ok_or(ModelError::NotNormalLayer { index: at.layer })
    }
}
// Loading. Nobody is listening yet, so nothing is notified.
impl Document {
    pub fn push_page(&mut self, page: Page) {
        self.pages.push(page);
    }
    pub fn push_resource(&mut self, resource: EmbeddedResource) {
        self.resources.push(resource);
    }
}
// Notifying mutation.
impl Document {
    pub fn add_page(
        &mut self,
        index: usize,
        page: Page,
        observer: &mut dyn DocumentObserver,
    ) -> Result<(), ModelError> {
        self.add_pages(index, smallvec::smallvec![page], observer)
    }
    /// Insert pages so that the first lands at `index`, shifting later pages back.
    pub fn add_pages(
        &mut self,
        index: usize,
        pages: Pages,
        observer: &mut dyn DocumentObserver,
    ) -> Result<(), ModelError> {
        ModelError::check_insert(index, self.pages.len())?;
        let count = pages.len();
        if count == 0 {
            return Ok(());
        }
        let tail = self.pages.split_off(index);
        self.pages.extend(pages);
        self.pages.extend(tail);
        observer.pages_added(index, &self.pages[index..index + count]);
        Ok(())
    }
    pub fn delete_page(
        &mut self,
        index: usize,
        observer: &mut dyn DocumentObserver,
    ) -> Result<Page, ModelError> {
        ModelError::check_index(index, self.pages.len())?;
        let page = self.pages.remove(index);
        observer.pages_deleted(index, 1);
        Ok(page)
    }
    pub fn delete_pages(
        &mut self,
        index: usize,
        count: usize,
        observer: &mut dyn DocumentObserver,
    ) -> Result<Pages, ModelError> {
        ModelError::check_range(index, count, self.pages.len())?;
        if count == 0 {
            return Ok(Pages::new());
        }
        let pages: Pages = self.pages.drain(index..index + count).collect();
        observer.pages_deleted(index, count);
        Ok(pages)
    }
    pub fn add_layer(
        &mut self,
        page: usize,
        index: usize,
        layer: Layer,
        observer: &mut dyn DocumentObserver,
    ) -> Result<(), ModelError> {
        self.page_mut(page)?.add_layer(page, index, layer, observer)
    }
    /// [`Self::add_layer`] with a fresh, empty drawing layer.
    pub fn add_normal_layer(
        &mut self,
        page: usize,
        index: usize,
        observer: &mut dyn DocumentObserver,
    ) -> Result<(), ModelError> {
        self.add_layer(page, index, Layer::Normal(NormalLayer::new()), observer)
    }
    pub fn delete_layer(
        &mut self,
        page: usize,
        index: usize,
        observer: &mut dyn DocumentObserver,
    ) -> Result<Layer, ModelError> {
        self.page_mut(page)?.delete_layer(page, index, observer)
    }
    pub fn add_stroke(
        &mut self,
        at: LayerPath,
        stroke: Stroke,
        observer: &mut dyn DocumentObserver,
    ) -> Result<(), ModelError> {
        self.normal_layer_mut(at)?.add_stroke(at, stroke, observer);
        Ok(())
    }
    /// Remove the last stroke of a layer.
    pub fn delete_stroke(
        &mut self,
        at: LayerPath,
        observer: &mut dyn DocumentObserver,
    ) -> Result<Stroke, ModelError> {
        self.normal_layer_mut(at)?.delete_stroke(at, observer)
    }
    pub fn add_resource(
        &mut self,
        index: usize,
        resource: EmbeddedResource,
        observer: &mut dyn DocumentObserver,
    ) -> Result<(), ModelError> {
        ModelError::check_insert(index, self.resources.len())?;
        self.resources.insert(index, resource);
        observer.resource_added(index, &self.resources[index]);
        Ok(())
    }
    /// Remove an embedded document.
    ///
    /// PDF layers still pointing at it keep it alive, but it is no longer part of the document.
    /// Callers are expected to remove those layers first.
    pub fn delete_resource(
        &mut self,
        index: usize,
        observer: &mut dyn DocumentObserver,
    ) -> Result<EmbeddedResource, ModelError> {
        ModelError::check_index(index, self.resources.len())?;
        let resource = self.resources.remove(index);
        observer.resource_deleted(index);
        Ok(resource)
    }
    /// Put a stroke on a page's temporary layer, to be removed once `timeout` has elapsed after `now`.
    pub fn add_fading_stroke(
        &mut self,
        page: usize,
        stroke: Stroke,
        now: Instant,
        timeout: Duration,
        observer: &mut dyn DocumentObserver,
    ) -> Result<(), ModelError> {
        self.page_mut(page)?
            .temporary_mut()
            .add(page, stroke, now, timeout, observer);
        Ok(())
    }
    /// Remove every fading stroke whose countdown has run out by `now`. Returns how many were removed.
    pub fn expire_fading(&mut self, now: Instant, observer: &mut dyn DocumentObserver) -> usize {
        self.pages
            .iter_mut()
            .enumerate()
            .map(|(index, page)| page.temporary_mut().expire(index, now, observer))
            .sum()
    }
}
