//! Embedded external documents (imported PDFs, for example).
//!
//! Parsing and rasterizing those documents is somebody else's job - the model only needs to know
//! how many pages there are and how big each one is. The renderer additionally asks for pixels.

use crate::geom::Size;
use std::sync::Arc;

pub type ResourceID = crate::Id<EmbeddedResource>;

/// An externally-owned document whose pages can be shown as [`PdfLayer`](super::PdfLayer)s.
pub trait EmbeddedDocument: std::fmt::Debug {
    fn page_count(&self) -> usize;
    /// Size of a page in page units, or `None` if `page` is out of range.
    fn page_size(&self, page: usize) -> Option<Size>;
    /// Rasterize a page into premultiplied RGBA8, `width * height * 4` bytes, row-major.
    ///
    /// The default never produces pixels, in which case the page is simply not drawn.
    fn rasterize(&self, page: usize, width: u32, height: u32) -> Option<Vec<u8>> {
        let _ = (page, width, height);
        None
    }
}

/// An embedded document as held by the [`Document`](super::Document).
///
/// Clones share the underlying source. Equality is identity.
#[derive(Clone, Debug)]
pub struct EmbeddedResource {
    id: ResourceID,
    source: Arc<dyn EmbeddedDocument>,
}
impl EmbeddedResource {
    #[must_use]
    pub fn new(source: Arc<dyn EmbeddedDocument>) -> Self {
        Self {
            id: ResourceID::new(),
            source,
        }
    }
    #[must_use]
    pub fn id(&self) -> ResourceID {
        self.id
    }
    #[must_use]
    pub fn source(&self) -> &Arc<dyn EmbeddedDocument> {
        &self.source
    }
}
impl PartialEq for EmbeddedResource {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for EmbeddedResource {}
