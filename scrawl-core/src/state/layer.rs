use super::{LayerPath, ModelError, ResourceID};
use crate::{observer::DocumentObserver, stroke::Stroke};

/// A user-drawn layer.
///
/// Strokes are only ever appended at the end or removed from the end. Commands rely on this to
/// move strokes in and out without tracking indices, and the render cache relies on it to draw
/// additions incrementally.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct NormalLayer {
    strokes: Vec<Stroke>,
}
impl NormalLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
    #[must_use]
    pub fn last(&self) -> Option<&Stroke> {
        self.strokes.last()
    }
    /// Append without notifying anyone. For building a document during load.
    pub fn push_stroke(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }
    pub(crate) fn add_stroke(
        &mut self,
        at: LayerPath,
        stroke: Stroke,
        observer: &mut dyn DocumentObserver,
    ) {
        self.strokes.push(stroke);
        if let Some(added) = self.strokes.last() {
            observer.stroke_added(at, added);
        }
    }
    /// Remove the tail stroke. Observers see `stroke_deleting` while the stroke is still in place,
    /// then `stroke_deleted` once it is gone.
    pub(crate) fn delete_stroke(
        &mut self,
        at: LayerPath,
        observer: &mut dyn DocumentObserver,
    ) -> Result<Stroke, ModelError> {
        let Some((removed, remaining)) = self.strokes.split_last() else {
            return Err(ModelError::EmptyLayer);
        };
        observer.stroke_deleting(at, remaining, removed);
        let stroke = self.strokes.pop().ok_or(ModelError::EmptyLayer)?;
        observer.stroke_deleted(at);
        Ok(stroke)
    }
}

/// Read-only view of one page of an embedded document.
#[derive(Clone, Debug)]
pub struct PdfLayer {
    resource: super::EmbeddedResource,
    page: usize,
}
impl PdfLayer {
    #[must_use]
    pub fn new(resource: super::EmbeddedResource, page: usize) -> Self {
        Self { resource, page }
    }
    #[must_use]
    pub fn resource_id(&self) -> ResourceID {
        self.resource.id()
    }
    #[must_use]
    pub fn resource(&self) -> &super::EmbeddedResource {
        &self.resource
    }
    /// Index of the page within the embedded document.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }
    #[must_use]
    pub fn page_size(&self) -> Option<crate::geom::Size> {
        self.resource.source().page_size(self.page)
    }
}
impl PartialEq for PdfLayer {
    fn eq(&self, other: &Self) -> bool {
        self.resource == other.resource && self.page == other.page
    }
}
impl Eq for PdfLayer {}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Layer {
    Normal(NormalLayer),
    Pdf(PdfLayer),
}
impl Default for Layer {
    fn default() -> Self {
        Self::Normal(NormalLayer::default())
    }
}
impl From<NormalLayer> for Layer {
    fn from(value: NormalLayer) -> Self {
        Self::Normal(value)
    }
}
impl From<PdfLayer> for Layer {
    fn from(value: PdfLayer) -> Self {
        Self::Pdf(value)
    }
}
impl Layer {
    #[must_use]
    pub fn normal(&self) -> Option<&NormalLayer> {
        match self {
            Self::Normal(n) => Some(n),
            Self::Pdf(_) => None,
        }
    }
    pub fn normal_mut(&mut self) -> Option<&mut NormalLayer> {
        match self {
            Self::Normal(n) => Some(n),
            Self::Pdf(_) => None,
        }
    }
    #[must_use]
    pub fn pdf(&self) -> Option<&PdfLayer> {
        match self {
            Self::Pdf(p) => Some(p),
            Self::Normal(_) => None,
        }
    }
    /// Strokes held by this layer. Always empty for PDF layers.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        match self {
            Self::Normal(n) => n.strokes(),
            Self::Pdf(_) => &[],
        }
    }
}
