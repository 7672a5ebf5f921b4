//! Integer page-space geometry.
//!
//! All positions on a page are in fixed integer units. Conversion into physical units or pixels
//! only happens at the edges (file I/O, the view transform).

/// A position on a page, in page units.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}
impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}
impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

/// Size of a page, in page units.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}
impl Size {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// An axis-aligned box in page units. `right` and `bottom` are inclusive.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}
impl Bounds {
    /// The smallest bounds containing every point. `None` if there are no points.
    pub fn of_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let start = Self {
            left: first.x,
            top: first.y,
            right: first.x,
            bottom: first.y,
        };
        Some(points.fold(start, |acc, p| Self {
            left: acc.left.min(p.x),
            top: acc.top.min(p.y),
            right: acc.right.max(p.x),
            bottom: acc.bottom.max(p.y),
        }))
    }
    /// Grow outward on every side.
    #[must_use = "returns a new bounds without modifying `self`"]
    pub fn expand(self, by: i32) -> Self {
        Self {
            left: self.left.saturating_sub(by),
            top: self.top.saturating_sub(by),
            right: self.right.saturating_add(by),
            bottom: self.bottom.saturating_add(by),
        }
    }
    #[must_use = "returns a new bounds without modifying `self`"]
    pub fn union(self, other: Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        (self.left..=self.right).contains(&point.x) && (self.top..=self.bottom).contains(&point.y)
    }
}

#[cfg(test)]
mod test {
    use super::{Bounds, Point};
    #[test]
    fn bounds_of_points() {
        let points = [Point::new(5, -2), Point::new(-3, 7), Point::new(1, 1)];
        assert_eq!(
            Bounds::of_points(&points),
            Some(Bounds {
                left: -3,
                top: -2,
                right: 5,
                bottom: 7
            })
        );
        assert_eq!(Bounds::of_points(&[]), None);
    }
    #[test]
    fn expand_saturates() {
        let b = Bounds::of_points(&[Point::new(i32::MAX, 0)]).unwrap().expand(4);
        assert_eq!(b.right, i32::MAX);
        assert_eq!(b.left, i32::MAX - 4);
        assert!(b.contains(Point::new(i32::MAX - 1, 3)));
    }
}
