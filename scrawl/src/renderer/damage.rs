/// A region of device pixels that needs repainting. Never empty.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct DamageRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}
impl DamageRect {
    /// Rectangle covering `[left, right) x [top, bottom)`. `None` if that is empty.
    #[must_use]
    pub fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Option<Self> {
        if right <= left || bottom <= top {
            return None;
        }
        Some(Self {
            x: left,
            y: top,
            width: right.abs_diff(left),
            height: bottom.abs_diff(top),
        })
    }
    /// The whole of a `width` by `height` surface.
    #[must_use]
    pub fn full(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            x: 0,
            y: 0,
            width,
            height,
        })
    }
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        Self::from_ltrb(
            self.x.max(other.x),
            self.y.max(other.y),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        )
    }
    /// Smallest rectangle covering both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::from_ltrb(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
        // Both inputs are non-empty, so neither is their hull.
        .unwrap_or(*self)
    }
}

#[cfg(test)]
mod test {
    use super::DamageRect;
    #[test]
    fn empty_is_none() {
        assert_eq!(DamageRect::from_ltrb(5, 5, 5, 10), None);
        assert_eq!(DamageRect::from_ltrb(5, 5, 4, 10), None);
        assert_eq!(DamageRect::full(0, 10), None);
    }
    #[test]
    fn set_operations() {
        let a = DamageRect::from_ltrb(0, 0, 10, 10).unwrap();
        let b = DamageRect::from_ltrb(5, 5, 20, 15).unwrap();
        assert_eq!(a.intersect(&b), DamageRect::from_ltrb(5, 5, 10, 10));
        assert_eq!(Some(a.union(&b)), DamageRect::from_ltrb(0, 0, 20, 15));
        assert!(a.union(&b).contains(&a));
        assert!(!a.contains(&b));

        let far = DamageRect::from_ltrb(100, 100, 110, 110).unwrap();
        assert_eq!(a.intersect(&far), None);
    }
}
