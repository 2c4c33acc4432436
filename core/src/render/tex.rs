//! Textures and texture samplers.

use crate::math::{Color3, Vec2, Vec3, vec2, vec3};
use crate::util::buf::Buf2;

/// Texture coordinate, with `u` in the `x` and `v` in the `y` component.
pub type TexCoord = Vec2;

/// Returns a new texture coordinate.
#[inline]
pub const fn uv(u: f64, v: f64) -> TexCoord {
    vec2(u, v)
}

/// A two-dimensional image used to look up surface attributes such as
/// color, normal, or specular intensity by texture coordinate.
///
/// Texel row 0 corresponds to `v` = 0, the bottom of the image in the
/// usual texture coordinate convention. Images stored top row first
/// should be flipped vertically before use.
#[derive(Clone, Debug)]
pub struct Texture {
    w: f64,
    h: f64,
    data: Buf2<Color3>,
}

impl Texture {
    /// Returns the width of `self` in texels.
    #[inline]
    pub fn width(&self) -> f64 {
        self.w
    }
    /// Returns the height of `self` in texels.
    #[inline]
    pub fn height(&self) -> f64 {
        self.h
    }
    /// Returns the texel data of `self`.
    pub fn data(&self) -> &Buf2<Color3> {
        &self.data
    }
}

impl From<Buf2<Color3>> for Texture {
    fn from(data: Buf2<Color3>) -> Self {
        Self {
            w: data.width() as f64,
            h: data.height() as f64,
            data,
        }
    }
}

/// Nearest-texel lookup with coordinates outside the texture clamped to
/// its edge texels.
#[derive(Copy, Clone, Debug, Default)]
pub struct SamplerClamp;

impl SamplerClamp {
    /// Returns the texel of `tex` containing the point `tc`, with the
    /// texture spanning `0.0..1.0` on both axes.
    ///
    /// # Panics
    /// If `tex` is empty.
    pub fn sample(&self, tex: &Texture, tc: TexCoord) -> Color3 {
        self.sample_abs(tex, vec2(tc.x * tex.w, tc.y * tex.h))
    }

    /// Returns the texel of `tex` containing the point `tc`, measured in
    /// texels from the origin.
    ///
    /// # Panics
    /// If `tex` is empty.
    pub fn sample_abs(&self, tex: &Texture, tc: TexCoord) -> Color3 {
        use crate::math::float::f64;
        // NaN casts to zero
        let u = f64::floor(tc.x.clamp(0.0, tex.w - 1.0)) as usize;
        let v = f64::floor(tc.y.clamp(0.0, tex.h - 1.0)) as usize;
        tex.data[[u, v]]
    }
}

/// Decodes a normal vector stored in the channels of a color.
///
/// Each channel in `0..=255` maps linearly to a component in `-1.0..=1.0`.
/// The result is not normalized.
pub fn decode_normal(c: Color3) -> Vec3 {
    let [r, g, b] = c.0.map(|ch| ch as f64 / 255.0 * 2.0 - 1.0);
    vec3(r, g, b)
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::math::color::rgb;

    use super::*;

    const RED: Color3 = rgb(0xFF, 0, 0);
    const GREEN: Color3 = rgb(0, 0xFF, 0);
    const BLUE: Color3 = rgb(0, 0, 0xFF);
    const YELLOW: Color3 = rgb(0xFF, 0xFF, 0);

    /// Red and green on the bottom row, blue and yellow on the top.
    fn checker() -> Texture {
        Buf2::new(2, 2, [RED, GREEN, BLUE, YELLOW]).into()
    }

    #[test]
    fn nearest_texel_inside() {
        let (tex, s) = (checker(), SamplerClamp);
        assert_eq!(s.sample(&tex, uv(0.1, 0.1)), RED);
        assert_eq!(s.sample(&tex, uv(0.5, 0.0)), GREEN);
        assert_eq!(s.sample(&tex, uv(0.2, 0.7)), BLUE);
        assert_eq!(s.sample(&tex, uv(0.99, 0.5)), YELLOW);
        assert_eq!(s.sample_abs(&tex, uv(1.5, 1.5)), YELLOW);
    }

    #[test]
    fn outside_clamps_to_edge() {
        let (tex, s) = (checker(), SamplerClamp);
        assert_eq!(s.sample(&tex, uv(-3.0, -0.1)), RED);
        assert_eq!(s.sample(&tex, uv(7.0, 0.2)), GREEN);
        assert_eq!(s.sample(&tex, uv(1.0, 1.0)), YELLOW);
        assert_eq!(s.sample(&tex, uv(f64::NAN, 0.0)), RED);
    }

    #[test]
    fn decode_normal_range() {
        assert_approx_eq!(decode_normal(rgb(0, 0xFF, 0)), vec3(-1.0, 1.0, -1.0));
        let n = decode_normal(rgb(0x80, 0x80, 0xFF));
        assert!(0.0 < n.x && n.x < 0.01);
        assert!(0.0 < n.y && n.y < 0.01);
        assert_eq!(n.z, 1.0);
    }
}
