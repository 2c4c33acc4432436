//! Linear algebra and other useful mathematics.
//!
//! Includes [vectors][self::vec], [matrices][mat] and [colors][color], as
//! well as utilities such as approximate equality comparisons and
//! barycentric interpolation of vertex attributes.
//!
//! All geometric transforms are represented as 4×4 homogeneous matrices.
//! Points carry an implicit `w` of 1 and directions a `w` of 0. Normal
//! vectors must be transformed by the *invert-transpose* of a transform
//! rather than by the transform itself, or they will not stay perpendicular
//! to the transformed surface under non-uniform scaling.

use core::ops::{Add, Mul};

pub use {
    approx::ApproxEq,
    color::{Color3, Color3f, rgb, rgbf},
    mat::{Mat2, Mat3, Mat4, scale, translate},
    vec::{Vec2, Vec3, Vec4, vec2, vec3, vec4},
};

pub mod approx;
pub mod color;
pub mod float;
pub mod mat;
pub mod vec;

/// Linearly interpolates between `from` and `to`.
///
/// Returns `from` if `t` = 0 and `to` if `t` = 1. Values of `t` outside
/// the range [0, 1] extrapolate.
///
/// # Examples
/// ```
/// use softrast_core::math::{lerp, vec2};
///
/// assert_eq!(lerp(0.25, 1.0, 5.0), 2.0);
/// assert_eq!(lerp(0.5, vec2(-2.0, 0.0), vec2(2.0, 4.0)), vec2(0.0, 2.0));
/// ```
#[inline]
pub fn lerp<T>(t: f64, from: T, to: T) -> T
where
    T: Add<Output = T> + Mul<f64, Output = T>,
{
    from * (1.0 - t) + to * t
}

/// Returns the affine combination of three values with barycentric weights.
///
/// This is how per-vertex attributes are interpolated across a triangle:
/// given the attribute values at the three vertices and the weights of
/// a point inside the triangle, returns the attribute value at the point.
/// The weights are expected to sum to one.
///
/// # Examples
/// ```
/// use softrast_core::math::{bary, vec2, vec3};
///
/// let uvs = [vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(0.0, 1.0)];
/// assert_eq!(bary(uvs, vec3(0.5, 0.25, 0.25)), vec2(0.25, 0.25));
/// ```
#[inline]
pub fn bary<T>([a, b, c]: [T; 3], w: Vec3) -> T
where
    T: Add<Output = T> + Mul<f64, Output = T>,
{
    a * w.x + b * w.y + c * w.z
}
