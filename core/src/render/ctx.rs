//! Rendering context and parameters.

use core::cell::RefCell;

use crate::math::Color3;

use super::Stats;

/// Pipeline settings shared by render calls, plus the running totals
/// of their [`Stats`].
///
/// Settings are read-only during a call; only `stats` is updated, which
/// is why it sits behind a `RefCell`.
#[derive(Clone, Debug)]
pub struct Context {
    /// Color written over the whole color buffer by a clear, or `None`
    /// to leave the color buffer alone.
    pub color_clear: Option<Color3>,
    /// Depth written over the whole depth buffer by a clear. Larger is
    /// nearer, so anything drawn should be greater than this.
    pub depth_clear: f64,
    /// If `true`, a fragment is kept only if its depth is strictly
    /// greater than the stored depth. If `false`, every covered pixel
    /// is kept.
    pub depth_test: bool,
    /// If `false`, kept fragments do not update the color buffer.
    pub color_write: bool,
    /// If `false`, kept fragments do not update the depth buffer.
    pub depth_write: bool,
    /// Triangles whose doubled signed screen area is below this, in
    /// square pixels, are culled. Clockwise triangles have negative
    /// area and so are culled whenever this is positive.
    pub min_area: f64,
    /// Coverage of pixel centers exactly on an edge.
    pub fill_rule: FillRule,
    /// Totals over all render calls made with this context.
    pub stats: RefCell<Stats>,
}

/// Rule deciding the coverage of pixels whose center lies exactly on
/// an edge of a triangle.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum FillRule {
    /// A pixel is covered if none of its barycentric weights is negative.
    ///
    /// Pixels exactly on an edge shared by two triangles are drawn by both.
    #[default]
    Inclusive,
    /// A pixel exactly on an edge is covered only if the edge is a top or
    /// a left edge of the triangle.
    ///
    /// A top edge is horizontal with the triangle below it; a left edge
    /// has the triangle on its right. Adjacent triangles thus draw every
    /// pixel along their shared edge exactly once.
    TopLeft,
}

impl Context {
    /// Returns whether a fragment at depth `new` should replace the
    /// stored depth `curr`.
    #[inline]
    pub fn depth_test(&self, new: f64, curr: f64) -> bool {
        depth_test(self.depth_test, new, curr)
    }
}

/// Returns whether `new` is strictly nearer than `curr`, or `true` if
/// depth testing is disabled.
#[inline]
pub(crate) fn depth_test(enabled: bool, new: f64, curr: f64) -> bool {
    !enabled || new > curr
}

impl Default for Context {
    /// Clears to black and to negative infinity depth, tests and writes
    /// both buffers, culls back faces and triangles under one pixel of
    /// doubled area, and fills inclusively.
    fn default() -> Self {
        Self {
            color_clear: Some(Color3::BLACK),
            depth_clear: f64::NEG_INFINITY,
            depth_test: true,
            color_write: true,
            depth_write: true,
            min_area: 1.0,
            fill_rule: FillRule::default(),
            stats: Default::default(),
        }
    }
}
