//! Render targets.
//!
//! The typical render target is a framebuffer, comprising a color buffer
//! and a depth buffer. The rasterizer writes the color of each shaded
//! pixel to the color buffer and its depth to the depth buffer.

use crate::math::{Color3, color::gray};
use crate::util::{Dims, buf::Buf2};

use super::Context;

/// Trait for color buffers that can be used as render targets.
pub trait Target {
    /// Returns the width and height of `self` in pixels.
    fn dims(&self) -> Dims;

    /// Returns the color of the pixel at (x, y).
    ///
    /// # Panics
    /// If (x, y) is out of bounds.
    fn get(&self, x: usize, y: usize) -> Color3;

    /// Sets the color of the pixel at (x, y).
    ///
    /// # Panics
    /// If (x, y) is out of bounds.
    fn set(&mut self, x: usize, y: usize, c: Color3);

    /// Sets every pixel of `self` to `c`.
    fn clear(&mut self, c: Color3) {
        let (w, h) = self.dims();
        for y in 0..h {
            for x in 0..w {
                self.set(x, y, c);
            }
        }
    }
}

impl Target for Buf2<Color3> {
    fn dims(&self) -> Dims {
        Buf2::dims(self)
    }
    fn get(&self, x: usize, y: usize) -> Color3 {
        self[[x, y]]
    }
    fn set(&mut self, x: usize, y: usize, c: Color3) {
        self[[x, y]] = c;
    }
    fn clear(&mut self, c: Color3) {
        self.fill(c);
    }
}

/// A depth buffer, storing the depth of the nearest surface drawn so far
/// at each pixel.
///
/// Larger values are nearer to the viewer. Within a render pass, the depth
/// stored at each pixel only ever increases.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthBuf(Buf2<f64>);

impl DepthBuf {
    /// Returns a depth buffer with the given dimensions, with every value
    /// initialized to `clear`.
    pub fn new((w, h): Dims, clear: f64) -> Self {
        Self(Buf2::new_with(w, h, |_, _| clear))
    }
    /// Returns the width and height of `self`.
    pub fn dims(&self) -> Dims {
        self.0.dims()
    }
    /// Sets every value of `self` to `clear`.
    pub fn clear(&mut self, clear: f64) {
        self.0.fill(clear);
    }
    /// Returns the depth at (x, y).
    ///
    /// # Panics
    /// If (x, y) is out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.0[[x, y]]
    }
    /// Sets the depth at (x, y).
    ///
    /// # Panics
    /// If (x, y) is out of bounds.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: f64) {
        self.0[[x, y]] = z;
    }
    /// Returns the depth data of `self`.
    pub fn buf(&self) -> &Buf2<f64> {
        &self.0
    }

    /// Returns a grayscale visualization of `self`.
    ///
    /// The nearest depth maps to white and the farthest to black. Pixels
    /// that were never drawn to, or whose value is otherwise not finite,
    /// are black.
    pub fn to_image(&self) -> Buf2<Color3> {
        let finite = || self.0.iter().copied().filter(|z| z.is_finite());
        let lo = finite().fold(f64::INFINITY, f64::min);
        let hi = finite().fold(f64::NEG_INFINITY, f64::max);
        let range = hi - lo;
        self.0.map(|&z| {
            if !z.is_finite() {
                Color3::BLACK
            } else if range > 0.0 {
                // Reserve black for empty pixels
                gray((32.0 + 223.0 * (z - lo) / range) as u8)
            } else {
                Color3::WHITE
            }
        })
    }
}

/// Framebuffer, combining a color (pixel) buffer and a depth buffer.
#[derive(Clone, Debug)]
pub struct Framebuf<Col = Buf2<Color3>> {
    pub color_buf: Col,
    pub depth_buf: DepthBuf,
}

impl Framebuf {
    /// Returns a framebuffer with black pixels and the depth buffer cleared
    /// to the default depth clear value.
    pub fn new((w, h): Dims) -> Self {
        Self::with_color_buf(Buf2::new_default(w, h))
    }
}

impl<Col: Target> Framebuf<Col> {
    /// Returns a framebuffer using `color_buf` as its color buffer, with
    /// a depth buffer of the same dimensions.
    pub fn with_color_buf(color_buf: Col) -> Self {
        let depth_clear = Context::default().depth_clear;
        let depth_buf = DepthBuf::new(color_buf.dims(), depth_clear);
        Self { color_buf, depth_buf }
    }

    /// Returns the width and height of `self`.
    pub fn dims(&self) -> Dims {
        self.color_buf.dims()
    }

    /// Clears the color buffer to `ctx.color_clear` if set, and the depth
    /// buffer to `ctx.depth_clear`.
    pub fn clear(&mut self, ctx: &Context) {
        if let Some(c) = ctx.color_clear {
            self.color_buf.clear(c);
        }
        self.depth_buf.clear(ctx.depth_clear);
    }
}
