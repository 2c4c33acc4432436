//! Colors and color arithmetic.
//!
//! [`Color3`] is the 8-bit RGB storage format of framebuffers and textures.
//! [`Color3f`] is a linear floating-point RGB color used for lighting
//! computations, where intermediate values may exceed the `[0, 1]` range.

use core::fmt::{self, Debug, Formatter};
use core::ops::{Add, AddAssign, Index, Mul};

use super::approx::ApproxEq;

/// An RGB color with `u8` channels.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Color3(pub [u8; 3]);

/// An RGB color with `f64` channels, nominally in the range `[0, 1]`.
#[repr(transparent)]
#[derive(Copy, Clone, Default, PartialEq)]
pub struct Color3f(pub [f64; 3]);

/// Returns a new 8-bit RGB color with `r`, `g`, and `b` channels.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> Color3 {
    Color3([r, g, b])
}

/// Returns a new floating-point RGB color with `r`, `g`, and `b` channels.
#[inline]
pub const fn rgbf(r: f64, g: f64, b: f64) -> Color3f {
    Color3f([r, g, b])
}

/// Returns a shade of gray with all channels equal to `lum`.
#[inline]
pub const fn gray(lum: u8) -> Color3 {
    rgb(lum, lum, lum)
}

impl Color3 {
    pub const BLACK: Self = gray(0x00);
    pub const WHITE: Self = gray(0xFF);

    /// Returns the red channel of `self`.
    #[inline]
    pub const fn r(self) -> u8 {
        self.0[0]
    }
    /// Returns the green channel of `self`.
    #[inline]
    pub const fn g(self) -> u8 {
        self.0[1]
    }
    /// Returns the blue channel of `self`.
    #[inline]
    pub const fn b(self) -> u8 {
        self.0[2]
    }

    /// Returns a `u32` containing the channels of `self` in format
    /// `0x00_RR_GG_BB`.
    #[inline]
    pub const fn to_rgb_u32(self) -> u32 {
        let [r, g, b] = self.0;
        u32::from_be_bytes([0x00, r, g, b])
    }

    /// Returns `self` with channels mapped from `0..=255` to `0.0..=1.0`.
    #[inline]
    pub fn to_color3f(self) -> Color3f {
        Color3f(self.0.map(|c| c as f64 / 255.0))
    }
}

impl Color3f {
    pub const BLACK: Self = rgbf(0.0, 0.0, 0.0);
    pub const WHITE: Self = rgbf(1.0, 1.0, 1.0);

    /// Returns a `Color3` with the channels of `self` mapped to `u8`
    /// with `(c.clamp(0.0, 1.0) * 255.0) as u8`.
    #[inline]
    pub fn to_color3(self) -> Color3 {
        Color3(self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8))
    }

    /// Returns the channelwise product of `self` and `other`.
    ///
    /// Modulating a surface color by a light color gives the color of
    /// the reflected light.
    #[inline]
    #[must_use]
    pub fn modulate(self, other: Self) -> Self {
        let [r, g, b] = self.0;
        let [s, t, u] = other.0;
        rgbf(r * s, g * t, b * u)
    }
}

impl From<Color3> for Color3f {
    fn from(c: Color3) -> Self {
        c.to_color3f()
    }
}

impl From<Color3f> for Color3 {
    fn from(c: Color3f) -> Self {
        c.to_color3()
    }
}

impl Index<usize> for Color3 {
    type Output = u8;
    fn index(&self, i: usize) -> &u8 {
        &self.0[i]
    }
}

impl Index<usize> for Color3f {
    type Output = f64;
    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl Add for Color3f {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let [r, g, b] = self.0;
        let [s, t, u] = rhs.0;
        rgbf(r + s, g + t, b + u)
    }
}
impl AddAssign for Color3f {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for Color3f {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self(self.0.map(|c| c * rhs))
    }
}
impl Mul<Color3f> for f64 {
    type Output = Color3f;
    fn mul(self, rhs: Color3f) -> Color3f {
        rhs * self
    }
}

impl ApproxEq for Color3f {
    fn approx_eq_eps(&self, other: &Self, eps: f64) -> bool {
        self.0.approx_eq_eps(&other.0, eps)
    }
}

impl Debug for Color3 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "Color3[{r:#04X}, {g:#04X}, {b:#04X}]")
    }
}

impl Debug for Color3f {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Color3f")?;
        Debug::fmt(&self.0, f)
    }
}
