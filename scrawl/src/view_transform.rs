//! Mapping between page units and device pixels.

use scrawl_core::geom::{Point, Size};

/// Page-to-device transform: a uniform scale followed by an offset. Pages are never rotated or
/// flipped on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// Device pixels per page unit.
    pub scale: f32,
    /// Device position of the page's top-left corner.
    pub offset: cgmath::Vector2<f32>,
}

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum TransformError {
    #[error("viewport {width}x{height} is below the minimum of {min} pixels per side")]
    ViewportTooSmall { width: u32, height: u32, min: u32 },
    #[error("page has no area")]
    EmptyPage,
    /// Occurs if the scale is too close to zero.
    #[error("uninvertable")]
    Uninvertable,
}

impl ViewTransform {
    /// Fit the whole page inside the viewport, keeping its aspect ratio, with at least `margin`
    /// pixels on every side. The page is centered on whichever axis has room to spare.
    #[allow(clippy::cast_precision_loss)]
    pub fn fit(
        page: Size,
        viewport: [u32; 2],
        margin: f32,
        min_viewport: u32,
    ) -> Result<Self, TransformError> {
        let [width, height] = viewport;
        let margin = margin.max(0.0);
        // The minimum must leave room for the margins and at least a pixel of page.
        let min = min_viewport.max((2.0 * margin).ceil() as u32 + 1);
        if width < min || height < min {
            return Err(TransformError::ViewportTooSmall { width, height, min });
        }
        if page.is_empty() {
            return Err(TransformError::EmptyPage);
        }
        let available = [width as f32 - 2.0 * margin, height as f32 - 2.0 * margin];
        let scale = (available[0] / page.width as f32).min(available[1] / page.height as f32);
        let offset = cgmath::vec2(
            (width as f32 - page.width as f32 * scale) / 2.0,
            (height as f32 - page.height as f32 * scale) / 2.0,
        );
        Ok(Self { scale, offset })
    }
    /// Convert a point in page space to device space.
    #[must_use]
    pub fn project(&self, page_point: cgmath::Point2<f32>) -> cgmath::Point2<f32> {
        cgmath::point2(
            page_point.x * self.scale + self.offset.x,
            page_point.y * self.scale + self.offset.y,
        )
    }
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn project_point(&self, point: Point) -> cgmath::Point2<f32> {
        self.project(cgmath::point2(point.x as f32, point.y as f32))
    }
    /// Convert a point in device space to page space.
    pub fn unproject(
        &self,
        device_point: cgmath::Point2<f32>,
    ) -> Result<cgmath::Point2<f32>, TransformError> {
        if self.scale.abs() <= f32::EPSILON {
            return Err(TransformError::Uninvertable);
        }
        Ok(cgmath::point2(
            (device_point.x - self.offset.x) / self.scale,
            (device_point.y - self.offset.y) / self.scale,
        ))
    }
    /// [`Self::unproject`], rounded to the nearest page unit. For turning input positions into
    /// stroke points.
    #[allow(clippy::cast_possible_truncation)]
    pub fn unproject_point(&self, device_point: cgmath::Point2<f32>) -> Result<Point, TransformError> {
        let page = self.unproject(device_point)?;
        Ok(Point::new(page.x.round() as i32, page.y.round() as i32))
    }
    /// Homogeneous page-to-device matrix.
    #[must_use]
    pub fn page_to_device(&self) -> cgmath::Matrix3<f32> {
        #[rustfmt::skip]
        let matrix = cgmath::Matrix3::new(
            self.scale,    0.0,           0.0,
            0.0,           self.scale,    0.0,
            self.offset.x, self.offset.y, 1.0,
        );
        matrix
    }
    /// Homogeneous device-to-page matrix.
    pub fn device_to_page(&self) -> Result<cgmath::Matrix3<f32>, TransformError> {
        if self.scale.abs() <= f32::EPSILON {
            return Err(TransformError::Uninvertable);
        }
        let inv = 1.0 / self.scale;
        #[rustfmt::skip]
        let matrix = cgmath::Matrix3::new(
            inv,                   0.0,                   0.0,
            0.0,                   inv,                   0.0,
            -self.offset.x * inv,  -self.offset.y * inv,  1.0,
        );
        Ok(matrix)
    }
    /// The same transform, for drawing.
    #[must_use]
    pub fn to_skia(&self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_row(
            self.scale,
            0.0,
            0.0,
            self.scale,
            self.offset.x,
            self.offset.y,
        )
    }
}

#[cfg(test)]
mod test {
    use super::{TransformError, ViewTransform};
    use scrawl_core::geom::{Point, Size};

    const A4: Size = Size::new(2100, 2970);

    #[test]
    fn fits_with_margin() {
        let transform = ViewTransform::fit(A4, [1000, 1000], 8.0, 32).unwrap();
        // Height is the limiting axis.
        assert!((transform.scale - 984.0 / 2970.0).abs() < 1e-6);
        let top_left = transform.project_point(Point::new(0, 0));
        let bottom_right = transform.project_point(Point::new(2100, 2970));
        assert!((top_left.y - 8.0).abs() < 1e-3);
        assert!((bottom_right.y - 992.0).abs() < 1e-3);
        // Centered horizontally.
        assert!((top_left.x - (1000.0 - bottom_right.x)).abs() < 1e-3);
    }
    #[test]
    fn round_trip() {
        let transform = ViewTransform::fit(A4, [640, 480], 8.0, 32).unwrap();
        let point = Point::new(1234, 567);
        let device = transform.project_point(point);
        assert_eq!(transform.unproject_point(device), Ok(point));

        let forward = transform.page_to_device();
        let back = transform.device_to_page().unwrap();
        let v = back * (forward * cgmath::vec3(1234.0, 567.0, 1.0));
        assert!((v.x - 1234.0).abs() < 1e-2 && (v.y - 567.0).abs() < 1e-2);
        let d = forward * cgmath::vec3(1234.0, 567.0, 1.0);
        assert!((d.x - device.x).abs() < 1e-3 && (d.y - device.y).abs() < 1e-3);
    }
    #[test]
    fn rejects_small_viewports() {
        assert_eq!(
            ViewTransform::fit(A4, [31, 500], 8.0, 32),
            Err(TransformError::ViewportTooSmall {
                width: 31,
                height: 500,
                min: 32
            })
        );
        // Margins alone would eat the whole viewport.
        assert!(ViewTransform::fit(A4, [40, 40], 20.0, 8).is_err());
        assert_eq!(
            ViewTransform::fit(Size::new(0, 10), [100, 100], 8.0, 32),
            Err(TransformError::EmptyPage)
        );
    }
}
