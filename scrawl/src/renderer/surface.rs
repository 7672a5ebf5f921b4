//! One cached raster, and how strokes and embedded pages land on it.

use scrawl_core::{
    geom::{Point, Size},
    state::{Layer, PdfLayer},
    stroke::Stroke,
};
use tiny_skia as sk;

use crate::view_transform::ViewTransform;

/// A viewport-sized premultiplied RGBA8 raster for a single layer.
#[derive(Clone)]
pub struct LayerSurface {
    pixmap: sk::Pixmap,
}
impl std::fmt::Debug for LayerSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .finish_non_exhaustive()
    }
}
impl LayerSurface {
    /// A fully transparent surface. `None` if either dimension is zero.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Option<Self> {
        sk::Pixmap::new(width, height).map(|pixmap| Self { pixmap })
    }
    #[must_use]
    pub fn pixmap(&self) -> &sk::Pixmap {
        &self.pixmap
    }
    pub fn clear(&mut self) {
        self.pixmap.fill(sk::Color::TRANSPARENT);
    }
    /// Draw the whole content of a layer.
    pub fn draw_layer(&mut self, layer: &Layer, page_size: Size, transform: &ViewTransform) {
        match layer {
            Layer::Normal(normal) => {
                let transform = transform.to_skia();
                for stroke in normal.strokes() {
                    self.draw_stroke(stroke, transform);
                }
            }
            Layer::Pdf(pdf) => self.draw_pdf(pdf, page_size, transform),
        }
    }
    /// Clear, then draw `strokes` in order.
    pub fn rebuild<'a>(
        &mut self,
        strokes: impl IntoIterator<Item = &'a Stroke>,
        transform: sk::Transform,
    ) {
        self.clear();
        for stroke in strokes {
            self.draw_stroke(stroke, transform);
        }
    }
    /// Draw every segment of a stroke, in order.
    pub fn draw_stroke(&mut self, stroke: &Stroke, transform: sk::Transform) {
        for index in 0..stroke.points().len() {
            self.draw_segment(stroke, index, transform);
        }
    }
    /// Draw the segment ending at point `index`. Point zero is drawn as a dot.
    ///
    /// Drawing segments `0..n` one call at a time gives exactly the same pixels as
    /// [`Self::draw_stroke`] on the first `n` points.
    #[allow(clippy::cast_precision_loss)]
    pub fn draw_segment(&mut self, stroke: &Stroke, index: usize, transform: sk::Transform) {
        let points = stroke.points();
        let Some(&end) = points.get(index) else {
            return;
        };
        let start = index.checked_sub(1).map(|prev| points[prev]);
        let paint = paint_for(stroke);
        let width = stroke.drawn_width() as f32;

        match start {
            Some(start) if start != end => {
                let mut builder = sk::PathBuilder::new();
                builder.move_to(start.x as f32, start.y as f32);
                builder.line_to(end.x as f32, end.y as f32);
                let Some(path) = builder.finish() else {
                    return;
                };
                let style = sk::Stroke {
                    width,
                    line_cap: sk::LineCap::Round,
                    line_join: sk::LineJoin::Round,
                    ..Default::default()
                };
                self.pixmap
                    .stroke_path(&path, &paint, &style, transform, None);
            }
            // A repeated point draws nothing new.
            Some(_) => (),
            None => self.draw_dot(end, width, &paint, transform),
        }
    }
    #[allow(clippy::cast_precision_loss)]
    fn draw_dot(&mut self, at: Point, width: f32, paint: &sk::Paint, transform: sk::Transform) {
        let Some(path) = sk::PathBuilder::from_circle(at.x as f32, at.y as f32, width / 2.0) else {
            return;
        };
        self.pixmap
            .fill_path(&path, paint, sk::FillRule::Winding, transform, None);
    }
    /// Draw an embedded page stretched over the whole page area.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn draw_pdf(&mut self, layer: &PdfLayer, page_size: Size, transform: &ViewTransform) {
        let width = (page_size.width as f32 * transform.scale).round() as u32;
        let height = (page_size.height as f32 * transform.scale).round() as u32;
        if width == 0 || height == 0 {
            return;
        }
        let Some(pixels) = layer
            .resource()
            .source()
            .rasterize(layer.page(), width, height)
        else {
            log::debug!(
                "{} page {} has no raster, leaving its layer blank",
                layer.resource_id(),
                layer.page()
            );
            return;
        };
        let Some(image) = sk::IntSize::from_wh(width, height)
            .and_then(|size| sk::Pixmap::from_vec(pixels, size))
        else {
            log::warn!(
                "{} page {} rasterized to the wrong size, expected {width}x{height}",
                layer.resource_id(),
                layer.page()
            );
            return;
        };
        self.pixmap.draw_pixmap(
            transform.offset.x.round() as i32,
            transform.offset.y.round() as i32,
            image.as_ref(),
            &sk::PixmapPaint::default(),
            sk::Transform::identity(),
            None,
        );
    }
}

fn paint_for(stroke: &Stroke) -> sk::Paint<'static> {
    let mut paint = sk::Paint {
        anti_alias: true,
        ..Default::default()
    };
    match stroke {
        Stroke::Pen(pen) => {
            let [r, g, b, a] = pen.color.as_array();
            paint.set_color_rgba8(r, g, b, a);
        }
        // Replace, don't paint over, so erasing never leaves translucency behind.
        Stroke::Eraser(_) => paint.blend_mode = sk::BlendMode::Clear,
    }
    paint
}

#[cfg(test)]
mod test {
    use super::LayerSurface;
    use scrawl_core::{color::Color, geom::Point, stroke::Stroke};
    use tiny_skia::Transform;

    fn line(from: [i32; 2], to: [i32; 2], width: u32) -> Stroke {
        Stroke::pen(width, Color::BLACK).with_points([from.into(), to.into()])
    }

    #[test]
    fn segments_match_whole_stroke() {
        let stroke = Stroke::pen(6, Color::from_rgba8(200, 20, 20, 128)).with_points([
            Point::new(10, 10),
            Point::new(40, 15),
            Point::new(40, 15),
            Point::new(60, 50),
        ]);
        let mut whole = LayerSurface::new(80, 80).unwrap();
        whole.draw_stroke(&stroke, Transform::identity());

        let mut pieces = LayerSurface::new(80, 80).unwrap();
        for index in 0..stroke.points().len() {
            pieces.draw_segment(&stroke, index, Transform::identity());
        }
        assert_eq!(whole.pixmap().data(), pieces.pixmap().data());
        assert!(whole.pixmap().pixel(40, 15).unwrap().alpha() > 0);
    }
    #[test]
    fn single_point_is_a_dot() {
        let mut surface = LayerSurface::new(20, 20).unwrap();
        let dot = Stroke::pen(6, Color::BLACK).with_points([Point::new(10, 10)]);
        surface.draw_stroke(&dot, Transform::identity());
        assert_eq!(surface.pixmap().pixel(10, 10).unwrap().alpha(), 255);
        assert_eq!(surface.pixmap().pixel(1, 1).unwrap().alpha(), 0);
    }
    #[test]
    fn eraser_clears_fully() {
        let mut surface = LayerSurface::new(40, 40).unwrap();
        // Stack of translucent strokes.
        for _ in 0..5 {
            surface.draw_stroke(
                &Stroke::pen(10, Color::from_rgba8(0, 0, 255, 100))
                    .with_points([Point::new(0, 20), Point::new(40, 20)]),
                Transform::identity(),
            );
        }
        surface.draw_stroke(&line([0, 20], [40, 20], 10), Transform::identity());
        assert_eq!(surface.pixmap().pixel(20, 20).unwrap().alpha(), 255);

        let eraser = Stroke::eraser(8).with_points([Point::new(20, 0), Point::new(20, 40)]);
        surface.draw_stroke(&eraser, Transform::identity());
        assert_eq!(surface.pixmap().pixel(20, 20).unwrap().alpha(), 0);
        // Outside the eraser's path is untouched.
        assert_eq!(surface.pixmap().pixel(5, 20).unwrap().alpha(), 255);
    }
}
