//! # Renderer
//!
//! A [`PageRenderer`] keeps one raster [surface](LayerSurface) per layer of the page it shows,
//! plus one for the page's temporary layer, always in the same order as the page's layers. It is
//! a [`DocumentObserver`]: hand it to every mutation of the document and it updates itself before
//! the mutation returns.
//!
//! Appended strokes are drawn onto the existing surface and report a damage rect around just the
//! stroke. Anything else (a removed stroke, expired fading strokes, a new layer) rebuilds the
//! affected surface from scratch and damages the whole viewport.

pub mod damage;
mod surface;

pub use damage::DamageRect;
pub use surface::LayerSurface;

use scrawl_core::{
    geom::{Bounds, Point, Size},
    observer::DocumentObserver,
    state::{Document, EmbeddedResource, Layer, LayerPath, Page, TemporaryLayer},
    stroke::Stroke,
};

use crate::view_transform::{TransformError, ViewTransform};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    /// Extra device pixels around every stroke damage rect, to cover antialiasing.
    pub damage_margin: u32,
    /// Minimum device pixels between the page and the viewport edge.
    pub viewport_margin: f32,
    /// Smallest accepted viewport side, in device pixels.
    pub min_viewport: u32,
    /// Opacity of the temporary layer when composited over the others, 0 to 1.
    pub temporary_opacity: f32,
}
impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            damage_margin: 2,
            viewport_margin: 8.0,
            min_viewport: 32,
            temporary_opacity: 0.5,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("page {0} does not exist")]
    NoSuchPage(usize),
    #[error("layer {0} cannot take strokes")]
    NoSuchTarget(usize),
    #[error("could not allocate a {0}x{1} surface")]
    Allocation(u32, u32),
}

/// Which surface of the shown page a live stroke draws onto.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Target {
    Layer(usize),
    Temporary,
}

#[derive(Debug)]
struct LiveStroke {
    target: Target,
    stroke: Stroke,
}

#[derive(Debug)]
pub struct PageRenderer {
    /// Index of the shown page. `None` once that page has been deleted.
    page: Option<usize>,
    /// Where the shown page was when it got deleted. Pages coming back there are shown again.
    detached: Option<usize>,
    page_size: Size,
    viewport: [u32; 2],
    settings: RenderSettings,
    transform: ViewTransform,
    layers: Vec<LayerSurface>,
    temporary: LayerSurface,
    live: Option<LiveStroke>,
    /// A finished live stroke, already on its surface, waiting to be committed to the model.
    adopted: Option<LiveStroke>,
    damage: Vec<DamageRect>,
}

impl PageRenderer {
    /// Render page `page` of `document` into a `viewport` sized cache.
    pub fn new(
        document: &Document,
        page: usize,
        viewport: [u32; 2],
        settings: RenderSettings,
    ) -> Result<Self, RenderError> {
        let source = document.page(page).ok_or(RenderError::NoSuchPage(page))?;
        let transform = ViewTransform::fit(
            source.size(),
            viewport,
            settings.viewport_margin,
            settings.min_viewport,
        )?;
        let (layers, temporary) = render_page(source, viewport, &transform)?;
        let mut this = Self {
            page: Some(page),
            detached: None,
            page_size: source.size(),
            viewport,
            settings,
            transform,
            layers,
            temporary,
            live: None,
            adopted: None,
            damage: Vec::new(),
        };
        this.damage_full();
        Ok(this)
    }
    /// Show a different page, rebuilding everything. Cancels any live stroke.
    ///
    /// On error, the previous page stays up.
    pub fn show(&mut self, document: &Document, page: usize) -> Result<(), RenderError> {
        let source = document.page(page).ok_or(RenderError::NoSuchPage(page))?;
        log::debug!("Retargeting render from page {:?} to {page}", self.page);
        self.attach(page, source)
    }
    /// Adapt to a new viewport size, rebuilding everything. The live stroke survives.
    ///
    /// On error, nothing changes.
    pub fn resize(&mut self, document: &Document, viewport: [u32; 2]) -> Result<(), RenderError> {
        let transform = ViewTransform::fit(
            self.page_size,
            viewport,
            self.settings.viewport_margin,
            self.settings.min_viewport,
        )?;
        let (layers, temporary) = match self.page.and_then(|page| document.page(page)) {
            Some(source) => render_page(source, viewport, &transform)?,
            None => (Vec::new(), blank(viewport)?),
        };
        self.viewport = viewport;
        self.transform = transform;
        self.layers = layers;
        self.temporary = temporary;
        // Whatever was adopted is gone from the new surfaces, so it gets drawn on commit.
        self.adopted = None;
        if let Some(target) = self.live.as_ref().map(|live| live.target) {
            self.redraw_live_on(target);
        }
        self.damage_full();
        Ok(())
    }
    /// Replace everything with a render of `source`, which is page `page`.
    fn attach(&mut self, page: usize, source: &Page) -> Result<(), RenderError> {
        let transform = ViewTransform::fit(
            source.size(),
            self.viewport,
            self.settings.viewport_margin,
            self.settings.min_viewport,
        )?;
        let (layers, temporary) = render_page(source, self.viewport, &transform)?;
        self.page = Some(page);
        self.detached = None;
        self.page_size = source.size();
        self.transform = transform;
        self.layers = layers;
        self.temporary = temporary;
        self.live = None;
        self.adopted = None;
        self.damage_full();
        Ok(())
    }
    /// Forget the page entirely, e.g. because it was deleted.
    fn detach(&mut self) {
        self.detached = self.page.take();
        self.live = None;
        self.adopted = None;
        self.layers.clear();
        self.temporary.clear();
        self.damage_full();
    }

    /// Index of the shown page, if it still exists.
    #[must_use]
    pub fn page(&self) -> Option<usize> {
        self.page
    }
    #[must_use]
    pub fn viewport(&self) -> [u32; 2] {
        self.viewport
    }
    #[must_use]
    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }
    #[must_use]
    pub fn page_to_device(&self) -> cgmath::Matrix3<f32> {
        self.transform.page_to_device()
    }
    pub fn device_to_page(&self) -> Result<cgmath::Matrix3<f32>, TransformError> {
        self.transform.device_to_page()
    }
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
    /// Raster of layer `index`, in page order. Composite these bottom to top.
    #[must_use]
    pub fn surface(&self, index: usize) -> Option<&tiny_skia::Pixmap> {
        self.layers.get(index).map(LayerSurface::pixmap)
    }
    /// Raster of the temporary layer. Meant to be composited above every other layer at
    /// [`Self::temporary_opacity`].
    #[must_use]
    pub fn temporary_surface(&self) -> &tiny_skia::Pixmap {
        self.temporary.pixmap()
    }
    #[must_use]
    pub fn temporary_opacity(&self) -> f32 {
        self.settings.temporary_opacity
    }
    /// Draw every layer bottom to top onto `target`, then the temporary layer at reduced opacity.
    /// `target` should be viewport sized.
    pub fn composite(&self, target: &mut tiny_skia::Pixmap) {
        let identity = tiny_skia::Transform::identity();
        for layer in &self.layers {
            target.draw_pixmap(
                0,
                0,
                layer.pixmap().as_ref(),
                &tiny_skia::PixmapPaint::default(),
                identity,
                None,
            );
        }
        let faded = tiny_skia::PixmapPaint {
            opacity: self.settings.temporary_opacity,
            ..Default::default()
        };
        target.draw_pixmap(0, 0, self.temporary.pixmap().as_ref(), &faded, identity, None);
    }
    /// Damage rect covering the whole viewport.
    #[must_use]
    pub fn full_rect(&self) -> DamageRect {
        let [width, height] = self.viewport;
        // Viewports below the minimum are rejected on construction.
        DamageRect::full(width, height).unwrap_or(DamageRect {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
        })
    }
    /// Take every damage rect reported since the last call, oldest first.
    pub fn take_damage(&mut self) -> Vec<DamageRect> {
        std::mem::take(&mut self.damage)
    }

    /// Start drawing `stroke` live. Points it already has are drawn immediately.
    ///
    /// A previous live stroke is forgotten but not erased, so [`Self::cancel_stroke`] it first.
    pub fn begin_stroke(&mut self, target: Target, stroke: Stroke) -> Result<(), RenderError> {
        if let Target::Layer(index) = target {
            if index >= self.layers.len() {
                return Err(RenderError::NoSuchTarget(index));
            }
        }
        let transform = self.transform.to_skia();
        if let Some(surface) = pick(&mut self.layers, &mut self.temporary, target) {
            surface.draw_stroke(&stroke, transform);
        }
        if let Some(bounds) = stroke.bounds() {
            self.damage_bounds(bounds);
        }
        self.live = Some(LiveStroke { target, stroke });
        Ok(())
    }
    /// Append a point to the live stroke and draw just the new segment.
    pub fn extend_stroke(&mut self, point: Point) {
        let Some(live) = &mut self.live else {
            return;
        };
        live.stroke.push_point(point);
        let index = live.stroke.points().len() - 1;
        let transform = self.transform.to_skia();
        if let Some(surface) = pick(&mut self.layers, &mut self.temporary, live.target) {
            surface.draw_segment(&live.stroke, index, transform);
        }
        if let Some(bounds) = live.stroke.segment_bounds(index) {
            self.damage_bounds(bounds);
        }
    }
    #[must_use]
    pub fn live_stroke(&self) -> Option<(Target, &Stroke)> {
        self.live.as_ref().map(|live| (live.target, &live.stroke))
    }
    /// Stop drawing live, handing the stroke back for committing.
    ///
    /// The pixels stay where they are. When this same stroke is next added to the same target it
    /// is not drawn a second time. If it never arrives, call [`Self::abandon`].
    pub(crate) fn finish_stroke(&mut self) -> Option<(Target, Stroke)> {
        let LiveStroke { target, stroke } = self.live.take()?;
        self.adopted = Some(LiveStroke {
            target,
            stroke: stroke.clone(),
        });
        Some((target, stroke))
    }
    /// Throw away the live stroke and restore its surface from the model.
    pub fn cancel_stroke(&mut self, document: &Document) {
        if let Some(live) = self.live.take() {
            log::debug!("Cancelling live stroke on {:?}", live.target);
            self.restore(document, live.target);
        }
    }
    /// Undo a [`Self::finish_stroke`] whose stroke did not make it into the model.
    pub(crate) fn abandon(&mut self, document: &Document) {
        if let Some(adopted) = self.adopted.take() {
            self.restore(document, adopted.target);
        }
    }
    /// Rebuild one surface from the model.
    fn restore(&mut self, document: &Document, target: Target) {
        let Some(page) = self.page.and_then(|page| document.page(page)) else {
            return;
        };
        match target {
            Target::Layer(index) => {
                let (Some(layer), Some(surface)) = (page.layer(index), self.layers.get_mut(index))
                else {
                    return;
                };
                surface.clear();
                surface.draw_layer(layer, self.page_size, &self.transform);
                self.redraw_live_on(target);
                self.damage_full();
            }
            Target::Temporary => self.rebuild(target, page.temporary().strokes()),
        }
    }
    /// Clear `target` and draw `strokes` and then any live stroke over it.
    fn rebuild<'a>(&mut self, target: Target, strokes: impl IntoIterator<Item = &'a Stroke>) {
        log::debug!("Rebuilding {target:?}");
        let transform = self.transform.to_skia();
        if let Some(surface) = pick(&mut self.layers, &mut self.temporary, target) {
            surface.rebuild(strokes, transform);
        }
        self.redraw_live_on(target);
        self.damage_full();
    }
    fn redraw_live_on(&mut self, target: Target) {
        let Some(live) = self.live.as_ref().filter(|live| live.target == target) else {
            return;
        };
        let transform = self.transform.to_skia();
        if let Some(surface) = pick(&mut self.layers, &mut self.temporary, target) {
            surface.draw_stroke(&live.stroke, transform);
        }
    }
    /// Draw a stroke the model just gained, unless it is the adopted live stroke.
    ///
    /// Other strokes landing on the adopted target first are drawn above it, and the adoption
    /// waits for its own stroke.
    fn append(&mut self, target: Target, stroke: &Stroke) {
        let adopted = self
            .adopted
            .as_ref()
            .is_some_and(|adopted| adopted.target == target && adopted.stroke == *stroke);
        if adopted {
            self.adopted = None;
        } else {
            if self.adopted.as_ref().is_some_and(|adopted| adopted.target == target) {
                log::warn!("Stroke added to {target:?} ahead of the finished live stroke");
            }
            let transform = self.transform.to_skia();
            if let Some(surface) = pick(&mut self.layers, &mut self.temporary, target) {
                surface.draw_stroke(stroke, transform);
            }
        }
        if let Some(bounds) = stroke.bounds() {
            self.damage_bounds(bounds);
        }
    }

    /// Device-space damage for a page-space box, widened by the margin and clipped to the viewport.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn bounds_damage(&self, bounds: Bounds) -> Option<DamageRect> {
        let top_left = self
            .transform
            .project_point(Point::new(bounds.left, bounds.top));
        let bottom_right = self
            .transform
            .project_point(Point::new(bounds.right, bounds.bottom));
        let margin = self.settings.damage_margin as i32;
        DamageRect::from_ltrb(
            (top_left.x.floor() as i32).saturating_sub(margin),
            (top_left.y.floor() as i32).saturating_sub(margin),
            (bottom_right.x.ceil() as i32).saturating_add(margin),
            (bottom_right.y.ceil() as i32).saturating_add(margin),
        )?
        .intersect(&self.full_rect())
    }
    fn damage_bounds(&mut self, bounds: Bounds) {
        match self.bounds_damage(bounds) {
            Some(rect) => self.damage.push(rect),
            None => log::warn!("Damage for {bounds:?} is entirely outside the viewport"),
        }
    }
    fn damage_full(&mut self) {
        let full = self.full_rect();
        self.damage.push(full);
    }
    fn shows(&self, page: usize) -> bool {
        self.page == Some(page)
    }
}

fn blank([width, height]: [u32; 2]) -> Result<LayerSurface, RenderError> {
    LayerSurface::new(width, height).ok_or(RenderError::Allocation(width, height))
}

fn render_layer(
    layer: &Layer,
    page_size: Size,
    viewport: [u32; 2],
    transform: &ViewTransform,
) -> Result<LayerSurface, RenderError> {
    let mut surface = blank(viewport)?;
    surface.draw_layer(layer, page_size, transform);
    Ok(surface)
}

/// Surfaces for every layer of `page`, and for its temporary layer.
fn render_page(
    page: &Page,
    viewport: [u32; 2],
    transform: &ViewTransform,
) -> Result<(Vec<LayerSurface>, LayerSurface), RenderError> {
    log::debug!("Building {} layer surfaces", page.layer_count());
    let layers = page
        .layers()
        .iter()
        .map(|layer| render_layer(layer, page.size(), viewport, transform))
        .collect::<Result<_, _>>()?;
    let mut temporary = blank(viewport)?;
    let skia = transform.to_skia();
    for stroke in page.temporary().strokes() {
        temporary.draw_stroke(stroke, skia);
    }
    Ok((layers, temporary))
}

fn pick<'a>(
    layers: &'a mut [LayerSurface],
    temporary: &'a mut LayerSurface,
    target: Target,
) -> Option<&'a mut LayerSurface> {
    match target {
        Target::Layer(index) => layers.get_mut(index),
        Target::Temporary => Some(temporary),
    }
}

impl DocumentObserver for PageRenderer {
    fn pages_added(&mut self, index: usize, pages: &[Page]) {
        match (self.page, self.detached) {
            (Some(page), _) if index <= page => self.page = Some(page + pages.len()),
            (None, Some(page)) if (index..index + pages.len()).contains(&page) => {
                log::debug!("Shown page {page} is back");
                if let Err(err) = self.attach(page, &pages[page - index]) {
                    log::error!("Failed to render returning page {page}: {err}");
                }
            }
            _ => (),
        }
    }
    fn pages_deleted(&mut self, index: usize, count: usize) {
        let Some(page) = self.page else {
            return;
        };
        if page >= index + count {
            self.page = Some(page - count);
        } else if page >= index {
            log::debug!("Shown page {page} was deleted");
            self.detach();
        }
    }
    fn layer_added(&mut self, page: usize, index: usize, layer: &Layer) {
        if !self.shows(page) {
            return;
        }
        if index > self.layers.len() {
            log::warn!("Layer {index} added past the end of {} surfaces", self.layers.len());
            return;
        }
        let surface = match render_layer(layer, self.page_size, self.viewport, &self.transform) {
            Ok(surface) => surface,
            Err(err) => {
                log::error!("Failed to build surface for new layer: {err}");
                return;
            }
        };
        self.layers.insert(index, surface);
        let shift = |target: &mut Target| {
            if let Target::Layer(i) = target {
                if *i >= index {
                    *i += 1;
                }
            }
        };
        if let Some(live) = &mut self.live {
            shift(&mut live.target);
        }
        if let Some(adopted) = &mut self.adopted {
            shift(&mut adopted.target);
        }
        self.damage_full();
    }
    fn layer_deleted(&mut self, page: usize, index: usize) {
        if !self.shows(page) {
            return;
        }
        if index < self.layers.len() {
            self.layers.remove(index);
        }
        // `None` if the target itself went away.
        let shift = |target: Target| match target {
            Target::Layer(i) if i == index => None,
            Target::Layer(i) if i > index => Some(Target::Layer(i - 1)),
            other => Some(other),
        };
        if let Some(live) = self.live.take() {
            match shift(live.target) {
                Some(target) => {
                    self.live = Some(LiveStroke {
                        target,
                        stroke: live.stroke,
                    });
                }
                None => log::debug!("Layer under the live stroke was deleted, cancelling it"),
            }
        }
        self.adopted = self.adopted.take().and_then(|adopted| {
            Some(LiveStroke {
                target: shift(adopted.target)?,
                stroke: adopted.stroke,
            })
        });
        self.damage_full();
    }
    fn stroke_added(&mut self, at: LayerPath, stroke: &Stroke) {
        if self.shows(at.page) {
            self.append(Target::Layer(at.layer), stroke);
        }
    }
    fn stroke_deleting(&mut self, at: LayerPath, remaining: &[Stroke], _: &Stroke) {
        if self.shows(at.page) {
            self.rebuild(Target::Layer(at.layer), remaining);
        }
    }
    fn resource_added(&mut self, _: usize, resource: &EmbeddedResource) {
        log::trace!("Resource {} available for rendering", resource.id());
    }
    fn fading_added(&mut self, page: usize, stroke: &Stroke) {
        if self.shows(page) {
            self.append(Target::Temporary, stroke);
        }
    }
    fn fading_expired(&mut self, page: usize, remaining: &TemporaryLayer) {
        if self.shows(page) {
            self.rebuild(Target::Temporary, remaining.strokes());
        }
    }
}
