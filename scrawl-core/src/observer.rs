//! # Observers
//!
//! Every notifying mutation of the [state](crate::state) takes a `&mut dyn DocumentObserver` and
//! reports what it did, synchronously, before returning. There is no queue: by the time a mutating
//! call returns, every observer (the render cache, chiefly) has already caught up.
//!
//! All methods default to doing nothing, so observers only implement what they care about.
//! `()` observes nothing, `Option<O>` forwards when present, and a tuple `(A, B)` forwards to both
//! in order.

use crate::{
    state::{EmbeddedResource, Layer, LayerPath, Page, TemporaryLayer},
    stroke::Stroke,
};

#[allow(unused_variables)]
pub trait DocumentObserver {
    /// `pages` were inserted, the first at `index`.
    fn pages_added(&mut self, index: usize, pages: &[Page]) {}
    fn pages_deleted(&mut self, index: usize, count: usize) {}
    fn layer_added(&mut self, page: usize, index: usize, layer: &Layer) {}
    fn layer_deleted(&mut self, page: usize, index: usize) {}
    /// `stroke` was appended to the end of the layer at `at`.
    fn stroke_added(&mut self, at: LayerPath, stroke: &Stroke) {}
    /// The tail stroke `removed` is about to be removed, leaving `remaining`.
    fn stroke_deleting(&mut self, at: LayerPath, remaining: &[Stroke], removed: &Stroke) {}
    fn stroke_deleted(&mut self, at: LayerPath) {}
    fn resource_added(&mut self, index: usize, resource: &EmbeddedResource) {}
    fn resource_deleted(&mut self, index: usize) {}
    /// A fading stroke was put on `page`'s temporary layer.
    fn fading_added(&mut self, page: usize, stroke: &Stroke) {}
    /// One or more fading strokes expired from `page`, leaving `remaining`.
    fn fading_expired(&mut self, page: usize, remaining: &TemporaryLayer) {}
}

impl DocumentObserver for () {}

impl<O: DocumentObserver + ?Sized> DocumentObserver for &mut O {
    fn pages_added(&mut self, index: usize, pages: &[Page]) {
        (**self).pages_added(index, pages);
    }
    fn pages_deleted(&mut self, index: usize, count: usize) {
        (**self).pages_deleted(index, count);
    }
    fn layer_added(&mut self, page: usize, index: usize, layer: &Layer) {
        (**self).layer_added(page, index, layer);
    }
    fn layer_deleted(&mut self, page: usize, index: usize) {
        (**self).layer_deleted(page, index);
    }
    fn stroke_added(&mut self, at: LayerPath, stroke: &Stroke) {
        (**self).stroke_added(at, stroke);
    }
    fn stroke_deleting(&mut self, at: LayerPath, remaining: &[Stroke], removed: &Stroke) {
        (**self).stroke_deleting(at, remaining, removed);
    }
    fn stroke_deleted(&mut self, at: LayerPath) {
        (**self).stroke_deleted(at);
    }
    fn resource_added(&mut self, index: usize, resource: &EmbeddedResource) {
        (**self).resource_added(index, resource);
    }
    fn resource_deleted(&mut self, index: usize) {
        (**self).resource_deleted(index);
    }
    fn fading_added(&mut self, page: usize, stroke: &Stroke) {
        (**self).fading_added(page, stroke);
    }
    fn fading_expired(&mut self, page: usize, remaining: &TemporaryLayer) {
        (**self).fading_expired(page, remaining);
    }
}

impl<O: DocumentObserver> DocumentObserver for Option<O> {
    fn pages_added(&mut self, index: usize, pages: &[Page]) {
        if let Some(o) = self {
            o.pages_added(index, pages);
        }
    }
    fn pages_deleted(&mut self, index: usize, count: usize) {
        if let Some(o) = self {
            o.pages_deleted(index, count);
        }
    }
    fn layer_added(&mut self, page: usize, index: usize, layer: &Layer) {
        if let Some(o) = self {
            o.layer_added(page, index, layer);
        }
    }
    fn layer_deleted(&mut self, page: usize, index: usize) {
        if let Some(o) = self {
            o.layer_deleted(page, index);
        }
    }
    fn stroke_added(&mut self, at: LayerPath, stroke: &Stroke) {
        if let Some(o) = self {
            o.stroke_added(at, stroke);
        }
    }
    fn stroke_deleting(&mut self, at: LayerPath, remaining: &[Stroke], removed: &Stroke) {
        if let Some(o) = self {
            o.stroke_deleting(at, remaining, removed);
        }
    }
    fn stroke_deleted(&mut self, at: LayerPath) {
        if let Some(o) = self {
            o.stroke_deleted(at);
        }
    }
    fn resource_added(&mut self, index: usize, resource: &EmbeddedResource) {
        if let Some(o) = self {
            o.resource_added(index, resource);
        }
    }
    fn resource_deleted(&mut self, index: usize) {
        if let Some(o) = self {
            o.resource_deleted(index);
        }
    }
    fn fading_added(&mut self, page: usize, stroke: &Stroke) {
        if let Some(o) = self {
            o.fading_added(page, stroke);
        }
    }
    fn fading_expired(&mut self, page: usize, remaining: &TemporaryLayer) {
        if let Some(o) = self {
            o.fading_expired(page, remaining);
        }
    }
}

impl<A: DocumentObserver, B: DocumentObserver> DocumentObserver for (A, B) {
    fn pages_added(&mut self, index: usize, pages: &[Page]) {
        self.0.pages_added(index, pages);
        self.1.pages_added(index, pages);
    }
    fn pages_deleted(&mut self, index: usize, count: usize) {
        self.0.pages_deleted(index, count);
        self.1.pages_deleted(index, count);
    }
    fn layer_added(&mut self, page: usize, index: usize, layer: &Layer) {
        self.0.layer_added(page, index, layer);
        self.1.layer_added(page, index, layer);
    }
    fn layer_deleted(&mut self, page: usize, index: usize) {
        self.0.layer_deleted(page, index);
        self.1.layer_deleted(page, index);
    }
    fn stroke_added(&mut self, at: LayerPath, stroke: &Stroke) {
        self.0.stroke_added(at, stroke);
        self.1.stroke_added(at, stroke);
    }
    fn stroke_deleting(&mut self, at: LayerPath, remaining: &[Stroke], removed: &Stroke) {
        self.0.stroke_deleting(at, remaining, removed);
        self.1.stroke_deleting(at, remaining, removed);
    }
    fn stroke_deleted(&mut self, at: LayerPath) {
        self.0.stroke_deleted(at);
        self.1.stroke_deleted(at);
    }
    fn resource_added(&mut self, index: usize, resource: &EmbeddedResource) {
        self.0.resource_added(index, resource);
        self.1.resource_added(index, resource);
    }
    fn resource_deleted(&mut self, index: usize) {
        self.0.resource_deleted(index);
        self.1.resource_deleted(index);
    }
    fn fading_added(&mut self, page: usize, stroke: &Stroke) {
        self.0.fading_added(page, stroke);
        self.1.fading_added(page, stroke);
    }
    fn fading_expired(&mut self, page: usize, remaining: &TemporaryLayer) {
        self.0.fading_expired(page, remaining);
        self.1.fading_expired(page, remaining);
    }
}

/// Owned summary of a single notification.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Change {
    PagesAdded { index: usize, count: usize },
    PagesDeleted { index: usize, count: usize },
    LayerAdded { page: usize, index: usize },
    LayerDeleted { page: usize, index: usize },
    StrokeAdded { at: LayerPath },
    StrokeDeleting { at: LayerPath, remaining: usize },
    StrokeDeleted { at: LayerPath },
    ResourceAdded { index: usize },
    ResourceDeleted { index: usize },
    FadingAdded { page: usize },
    FadingExpired { page: usize, remaining: usize },
}

/// Records every notification it sees, in order.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub changes: Vec<Change>,
}
impl Recorder {
    /// Take everything recorded so far.
    pub fn drain(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.changes)
    }
}
impl DocumentObserver for Recorder {
    fn pages_added(&mut self, index: usize, pages: &[Page]) {
        self.changes.push(Change::PagesAdded {
            index,
            count: pages.len(),
        });
    }
    fn pages_deleted(&mut self, index: usize, count: usize) {
        self.changes.push(Change::PagesDeleted { index, count });
    }
    fn layer_added(&mut self, page: usize, index: usize, _: &Layer) {
        self.changes.push(Change::LayerAdded { page, index });
    }
    fn layer_deleted(&mut self, page: usize, index: usize) {
        self.changes.push(Change::LayerDeleted { page, index });
    }
    fn stroke_added(&mut self, at: LayerPath, _: &Stroke) {
        self.changes.push(Change::StrokeAdded { at });
    }
    fn stroke_deleting(&mut self, at: LayerPath, remaining: &[Stroke], _: &Stroke) {
        self.changes.push(Change::StrokeDeleting {
            at,
            remaining: remaining.len(),
        });
    }
    fn stroke_deleted(&mut self, at: LayerPath) {
        self.changes.push(Change::StrokeDeleted { at });
    }
    fn resource_added(&mut self, index: usize, _: &EmbeddedResource) {
        self.changes.push(Change::ResourceAdded { index });
    }
    fn resource_deleted(&mut self, index: usize) {
        self.changes.push(Change::ResourceDeleted { index });
    }
    fn fading_added(&mut self, page: usize, _: &Stroke) {
        self.changes.push(Change::FadingAdded { page });
    }
    fn fading_expired(&mut self, page: usize, remaining: &TemporaryLayer) {
        self.changes.push(Change::FadingExpired {
            page,
            remaining: remaining.len(),
        });
    }
}

#[cfg(test)]
mod test {
    use super::{Change, DocumentObserver, Recorder};
    use crate::state::LayerPath;

    #[test]
    fn fan_out_in_order() {
        let mut first = Recorder::default();
        let mut second = Recorder::default();
        {
            let mut both = (&mut first, Some(&mut second));
            let observer: &mut dyn DocumentObserver = &mut both;
            observer.stroke_deleted(LayerPath::new(1, 2));
            observer.pages_deleted(0, 3);
        }
        let expected = [
            Change::StrokeDeleted {
                at: LayerPath::new(1, 2),
            },
            Change::PagesDeleted { index: 0, count: 3 },
        ];
        assert_eq!(first.changes, expected);
        assert_eq!(second.drain(), expected);
        assert!(second.changes.is_empty());
    }
    #[test]
    fn absent_observer() {
        let mut none: Option<Recorder> = None;
        none.pages_deleted(0, 1);
        assert!(none.is_none());
    }
}
