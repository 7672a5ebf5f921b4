//! # Strokes
//!
//! A stroke is one continuous freehand mark. There are exactly two kinds, and every place that
//! cares about the difference (drawing, bounds, saving) matches on [`Stroke`] exhaustively.

use crate::{
    color::Color,
    geom::{Bounds, Point},
};

#[derive(strum::AsRefStr, Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum StrokeKind {
    Pen,
    Eraser,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PenStroke {
    pub points: Vec<Point>,
    pub width: u32,
    pub color: Color,
}

/// Clears whatever is beneath it to full transparency.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EraserStroke {
    pub points: Vec<Point>,
    pub width: u32,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Stroke {
    Pen(PenStroke),
    Eraser(EraserStroke),
}
impl Stroke {
    #[must_use]
    pub fn pen(width: u32, color: Color) -> Self {
        Self::Pen(PenStroke {
            points: Vec::new(),
            width,
            color,
        })
    }
    #[must_use]
    pub fn eraser(width: u32) -> Self {
        Self::Eraser(EraserStroke {
            points: Vec::new(),
            width,
        })
    }
    /// Builder-style point append, for constructing strokes up-front.
    #[must_use]
    pub fn with_points(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.points_mut().extend(points);
        self
    }
    #[must_use]
    pub fn kind(&self) -> StrokeKind {
        match self {
            Self::Pen(_) => StrokeKind::Pen,
            Self::Eraser(_) => StrokeKind::Eraser,
        }
    }
    #[must_use]
    pub fn points(&self) -> &[Point] {
        match self {
            Self::Pen(PenStroke { points, .. }) | Self::Eraser(EraserStroke { points, .. }) => {
                points
            }
        }
    }
    fn points_mut(&mut self) -> &mut Vec<Point> {
        match self {
            Self::Pen(PenStroke { points, .. }) | Self::Eraser(EraserStroke { points, .. }) => {
                points
            }
        }
    }
    /// Append a point to the end of the path.
    ///
    /// Only strokes still being drawn are reachable mutably - once a stroke is committed into a
    /// layer it is never handed out as `&mut`.
    pub fn push_point(&mut self, point: Point) {
        self.points_mut().push(point);
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        match self {
            Self::Pen(PenStroke { width, .. }) | Self::Eraser(EraserStroke { width, .. }) => *width,
        }
    }
    /// The pen color, or `None` for erasers.
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        match self {
            Self::Pen(pen) => Some(pen.color),
            Self::Eraser(_) => None,
        }
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points().is_empty()
    }
    /// Area touched by the stroke in page units, including half the stroke width on every side.
    /// `None` for a stroke with no points.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Some(Bounds::of_points(self.points())?.expand(self.half_width()))
    }
    /// Area touched by the segment from `points[index - 1]` to `points[index]`
    /// (or just the dot at `points[0]`).
    #[must_use]
    pub fn segment_bounds(&self, index: usize) -> Option<Bounds> {
        let points = self.points();
        let end = points.get(index)?;
        let start = index.checked_sub(1).and_then(|i| points.get(i)).unwrap_or(end);
        Some(Bounds::of_points([start, end])?.expand(self.half_width()))
    }
    /// Width the stroke is drawn with. Zero-width strokes still leave a hairline.
    #[must_use]
    pub fn drawn_width(&self) -> u32 {
        self.width().max(1)
    }
    fn half_width(&self) -> i32 {
        i32::try_from(self.drawn_width().div_ceil(2)).unwrap_or(i32::MAX)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn bounds_include_width() {
        let stroke = Stroke::pen(5, Color::BLACK).with_points([Point::new(10, 10), Point::new(20, 4)]);
        assert_eq!(
            stroke.bounds(),
            Some(Bounds {
                left: 7,
                top: 1,
                right: 23,
                bottom: 13
            })
        );
        assert_eq!(Stroke::eraser(3).bounds(), None);
    }
    #[test]
    fn zero_width_bounds_cover_the_hairline() {
        let stroke = Stroke::pen(0, Color::BLACK).with_points([Point::new(5, 5)]);
        assert_eq!(stroke.drawn_width(), 1);
        assert_eq!(
            stroke.bounds(),
            Some(Bounds {
                left: 4,
                top: 4,
                right: 6,
                bottom: 6
            })
        );
        assert_eq!(stroke.segment_bounds(0), stroke.bounds());
    }
    #[test]
    fn segment_bounds() {
        let stroke = Stroke::eraser(2).with_points([
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
        ]);
        // First "segment" is the starting dot.
        assert_eq!(stroke.segment_bounds(0), Bounds::of_points(&[Point::new(0, 0)]).map(|b| b.expand(1)));
        assert_eq!(
            stroke.segment_bounds(2),
            Some(Bounds {
                left: 9,
                top: -1,
                right: 11,
                bottom: 11
            })
        );
        assert_eq!(stroke.segment_bounds(3), None);
    }
    #[test]
    fn kind_dispatch() {
        let pen = Stroke::pen(1, Color::WHITE);
        assert_eq!(pen.kind(), StrokeKind::Pen);
        assert_eq!(pen.color(), Some(Color::WHITE));
        assert_eq!(Stroke::eraser(1).color(), None);
        assert_eq!(StrokeKind::Eraser.as_ref(), "Eraser");
    }
}
