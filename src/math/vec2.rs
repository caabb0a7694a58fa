/// Texture-space coordinate pair.
///
/// `x` is `u` and `y` is `v`, both measured in texels: `(4.0, 0.0)` is the
/// left edge of the fifth texel column, not a normalized coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
