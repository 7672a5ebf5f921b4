//! # State
//!
//! The document tree: a [`Document`] owns [`Page`]s, a page owns [`Layer`]s plus one
//! [`TemporaryLayer`], and a [`NormalLayer`] owns [`Stroke`](crate::stroke::Stroke)s.
//!
//! Everything here is mutated either directly while loading (the `push_*` methods, which notify no
//! one) or through the notifying methods on [`Document`], which are what
//! [commands](crate::commands) use. Notifications are delivered synchronously to the
//! [`DocumentObserver`](crate::observer::DocumentObserver) passed in, before the call returns.

pub mod document;
pub mod fading;
pub mod layer;
pub mod page;
pub mod resource;

pub use document::Document;
pub use fading::TemporaryLayer;
pub use layer::{Layer, NormalLayer, PdfLayer};
pub use page::Page;
pub use resource::{EmbeddedDocument, EmbeddedResource, ResourceID};

/// Addresses one layer of one page.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct LayerPath {
    pub page: usize,
    pub layer: usize,
}
impl LayerPath {
    #[must_use]
    pub const fn new(page: usize, layer: usize) -> Self {
        Self { page, layer }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelError {
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("layer has no strokes to remove")]
    EmptyLayer,
    #[error("layer {index} does not hold strokes")]
    NotNormalLayer { index: usize },
}
impl ModelError {
    /// Check an index used for lookup or removal, `index < len`.
    pub(crate) fn check_index(index: usize, len: usize) -> Result<(), Self> {
        if index < len {
            Ok(())
        } else {
            Err(Self::OutOfRange { index, len })
        }
    }
    /// Check an index used for insertion, `index <= len`.
    pub(crate) fn check_insert(index: usize, len: usize) -> Result<(), Self> {
        if index <= len {
            Ok(())
        } else {
            Err(Self::OutOfRange { index, len })
        }
    }
    /// Check a removal of `count` elements starting at `index`.
    pub(crate) fn check_range(index: usize, count: usize, len: usize) -> Result<(), Self> {
        match index.checked_add(count) {
            Some(end) if end <= len => Ok(()),
            _ => Err(Self::OutOfRange { index, len }),
        }
    }
}
