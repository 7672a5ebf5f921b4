/// A straight (not premultiplied) sRGB color with alpha, eight bits per channel.
///
/// Strokes carry this verbatim - it is opaque to the model and only interpreted by the renderer.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Color([u8; 4]);
impl Color {
    pub const TRANSPARENT: Self = Self([0; 4]);
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    pub const WHITE: Self = Self([255; 4]);
    #[must_use]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }
    #[must_use]
    pub const fn as_array(&self) -> [u8; 4] {
        self.0
    }
    #[must_use]
    pub const fn alpha(&self) -> u8 {
        self.0[3]
    }
    /// Same color, with a different alpha.
    #[must_use = "returns a new color without modifying `self`"]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, alpha])
    }
}
impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
impl From<[u8; 4]> for Color {
    fn from(value: [u8; 4]) -> Self {
        Self(value)
    }
}
