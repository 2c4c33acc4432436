//! Real vectors of dimension 2, 3 and 4.
//!
//! The vectors are plain `Copy` structs with named `f64` components.
//! They implement the usual componentwise arithmetic as well as
//! multiplication and division by a scalar:
//! ```
//! use softrast_core::math::{vec3, Vec3};
//!
//! let v = vec3(1.0, 2.0, 3.0);
//! assert_eq!(v + v, 2.0 * v);
//! assert_eq!(v.dot(Vec3::X), 1.0);
//! ```

use core::fmt::{self, Debug, Formatter};
use core::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub,
    SubAssign,
};

use super::approx::ApproxEq;

/// A 2-vector, typically a screen-space point or a texture coordinate.
#[derive(Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

/// A 3-vector, used for points, directions and normals in 3D space.
#[derive(Copy, Clone, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A 4-vector, a point or direction in homogeneous coordinates.
///
/// Points have `w` = 1 and directions `w` = 0 before projection. After
/// a projective transform, dividing by `w` yields the Cartesian point.
#[derive(Copy, Clone, Default, PartialEq)]
pub struct Vec4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

/// Returns a 2-vector with components `x` and `y`.
#[inline]
pub const fn vec2(x: f64, y: f64) -> Vec2 {
    Vec2 { x, y }
}

/// Returns a 3-vector with components `x`, `y` and `z`.
#[inline]
pub const fn vec3(x: f64, y: f64, z: f64) -> Vec3 {
    Vec3 { x, y, z }
}

/// Returns a 4-vector with components `x`, `y`, `z` and `w`.
#[inline]
pub const fn vec4(x: f64, y: f64, z: f64, w: f64) -> Vec4 {
    Vec4 { x, y, z, w }
}

macro_rules! impl_vec {
    ($Vec:ident, $n:literal, $($f:ident),+) => {
        impl $Vec {
            /// The zero vector.
            pub const ZERO: Self = Self { $($f: 0.0),+ };

            /// Returns the components of `self` as an array.
            #[inline]
            pub const fn to_array(self) -> [f64; $n] {
                [$(self.$f),+]
            }

            /// Returns `self` with `f` applied to each component.
            #[inline]
            #[must_use]
            pub fn map(self, mut f: impl FnMut(f64) -> f64) -> Self {
                Self { $($f: f(self.$f)),+ }
            }

            /// Returns the result of applying `f` pairwise to the
            /// components of `self` and `other`.
            #[inline]
            #[must_use]
            pub fn zip_map(
                self,
                other: Self,
                mut f: impl FnMut(f64, f64) -> f64,
            ) -> Self {
                Self { $($f: f(self.$f, other.$f)),+ }
            }

            /// Returns the dot product of `self` and `other`.
            #[inline]
            pub fn dot(self, other: Self) -> f64 {
                0.0 $(+ self.$f * other.$f)+
            }

            /// Returns the squared Euclidean length of `self`.
            #[inline]
            pub fn len_sqr(self) -> f64 {
                self.dot(self)
            }

            /// Returns the Euclidean length of `self`.
            #[inline]
            pub fn len(self) -> f64 {
                use crate::math::float::f64;
                f64::sqrt(self.len_sqr())
            }

            /// Returns `self` scaled to unit length.
            ///
            /// The result is undefined if `self` has zero length; this is
            /// checked in debug builds. See [`Self::try_normalize`] for a
            /// fallible version.
            #[inline]
            #[must_use]
            pub fn normalize(self) -> Self {
                let len = self.len();
                debug_assert_ne!(len, 0.0, "cannot normalize a zero vector");
                self / len
            }

            /// Returns `self` scaled to unit length, or `None` if the length
            /// of `self` is zero or not finite.
            #[must_use]
            pub fn try_normalize(self) -> Option<Self> {
                let len = self.len();
                (len > 1e-12 && len.is_finite()).then(|| self / len)
            }

            /// Returns whether every component of `self` is finite.
            #[inline]
            pub fn is_finite(self) -> bool {
                true $(&& self.$f.is_finite())+
            }
        }

        impl From<[f64; $n]> for $Vec {
            #[inline]
            fn from([$($f),+]: [f64; $n]) -> Self {
                Self { $($f),+ }
            }
        }

        impl From<$Vec> for [f64; $n] {
            #[inline]
            fn from(v: $Vec) -> Self {
                v.to_array()
            }
        }

        impl Index<usize> for $Vec {
            type Output = f64;

            /// Returns the component at index `i`.
            ///
            /// # Panics
            /// If `i` is out of bounds.
            #[inline]
            fn index(&self, i: usize) -> &f64 {
                [$(&self.$f),+][i]
            }
        }

        impl IndexMut<usize> for $Vec {
            #[inline]
            fn index_mut(&mut self, i: usize) -> &mut f64 {
                [$(&mut self.$f),+][i]
            }
        }

        impl Add for $Vec {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                self.zip_map(rhs, Add::add)
            }
        }
        impl AddAssign for $Vec {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl Sub for $Vec {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                self.zip_map(rhs, Sub::sub)
            }
        }
        impl SubAssign for $Vec {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl Neg for $Vec {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                self.map(Neg::neg)
            }
        }

        impl Mul<f64> for $Vec {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: f64) -> Self {
                self.map(|c| c * rhs)
            }
        }
        impl MulAssign<f64> for $Vec {
            #[inline]
            fn mul_assign(&mut self, rhs: f64) {
                *self = *self * rhs;
            }
        }
        impl Mul<$Vec> for f64 {
            type Output = $Vec;
            #[inline]
            fn mul(self, rhs: $Vec) -> $Vec {
                rhs * self
            }
        }

        impl Div<f64> for $Vec {
            type Output = Self;
            #[inline]
            fn div(self, rhs: f64) -> Self {
                self.map(|c| c / rhs)
            }
        }
        impl DivAssign<f64> for $Vec {
            #[inline]
            fn div_assign(&mut self, rhs: f64) {
                *self = *self / rhs;
            }
        }

        impl ApproxEq for $Vec {
            fn approx_eq_eps(&self, other: &Self, eps: f64) -> bool {
                self.to_array().approx_eq_eps(&other.to_array(), eps)
            }
        }

        impl Debug for $Vec {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(f, "{}", stringify!($Vec))?;
                Debug::fmt(&self.to_array(), f)
            }
        }
    };
}

impl_vec!(Vec2, 2, x, y);
impl_vec!(Vec3, 3, x, y, z);
impl_vec!(Vec4, 4, x, y, z, w);

impl Vec2 {
    /// Unit vector in the x direction.
    pub const X: Self = vec2(1.0, 0.0);
    /// Unit vector in the y direction.
    pub const Y: Self = vec2(0.0, 1.0);

    /// Returns the scalar "cross product" `self.x * other.y - self.y * other.x`,
    /// twice the signed area of the triangle spanned by the two vectors.
    #[inline]
    pub fn perp_dot(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Returns a 3-vector with `self` as its xy components and the given z.
    #[inline]
    pub const fn to_vec3(self, z: f64) -> Vec3 {
        vec3(self.x, self.y, z)
    }
}

impl Vec3 {
    /// Unit vector in the x direction.
    pub const X: Self = vec3(1.0, 0.0, 0.0);
    /// Unit vector in the y direction.
    pub const Y: Self = vec3(0.0, 1.0, 0.0);
    /// Unit vector in the z direction.
    pub const Z: Self = vec3(0.0, 0.0, 1.0);

    /// Returns the cross product of `self` and `other`.
    ///
    /// The result is perpendicular to both and has length equal to the area
    /// of the parallelogram they span. Zero if the vectors are parallel.
    /// ```
    /// use softrast_core::math::Vec3;
    /// assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    /// assert_eq!(Vec3::Y.cross(Vec3::X), -Vec3::Z);
    /// ```
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        vec3(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Returns the reflection of `self` about the unit vector `n`:
    /// `2n(n·self) - self`.
    #[inline]
    #[must_use]
    pub fn reflect(self, n: Self) -> Self {
        n * (2.0 * n.dot(self)) - self
    }

    /// Returns the xy components of `self`.
    #[inline]
    pub const fn xy(self) -> Vec2 {
        vec2(self.x, self.y)
    }

    /// Returns `self` as a homogeneous point, with `w` = 1.
    #[inline]
    pub const fn to_pt(self) -> Vec4 {
        vec4(self.x, self.y, self.z, 1.0)
    }

    /// Returns `self` as a homogeneous direction, with `w` = 0.
    #[inline]
    pub const fn to_dir(self) -> Vec4 {
        vec4(self.x, self.y, self.z, 0.0)
    }
}

impl Vec4 {
    /// Returns the xyz components of `self`, ignoring `w`.
    #[inline]
    pub const fn xyz(self) -> Vec3 {
        vec3(self.x, self.y, self.z)
    }

    /// Returns the xy components of `self`, ignoring `z` and `w`.
    #[inline]
    pub const fn xy(self) -> Vec2 {
        vec2(self.x, self.y)
    }

    /// Returns the Cartesian point `xyz / w`, or `None` if `w` is zero.
    #[inline]
    pub fn project(self) -> Option<Vec3> {
        (self.w != 0.0).then(|| self.xyz() / self.w)
    }
}
