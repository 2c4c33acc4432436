//! Square matrices of dimension 2, 3 and 4.
//!
//! Matrices are stored in row-major order and act on column vectors:
//! in the product `M * v`, `v` is transformed by `M`, and in `A * B`,
//! `B` is applied first. A chain of transforms thus reads right to left.

use core::array::from_fn;
use core::fmt::{self, Debug, Formatter};
use core::ops::{Mul, MulAssign};

use super::approx::ApproxEq;
use super::vec::{Vec2, Vec3, Vec4, vec4};

/// A 2×2 matrix.
#[derive(Copy, Clone, PartialEq)]
pub struct Mat2(pub [[f64; 2]; 2]);

/// A 3×3 matrix.
#[derive(Copy, Clone, PartialEq)]
pub struct Mat3(pub [[f64; 3]; 3]);

/// A 4×4 matrix, representing an affine or projective transform in
/// homogeneous coordinates.
#[derive(Copy, Clone, PartialEq)]
pub struct Mat4(pub [[f64; 4]; 4]);

/// Matrices whose determinant is smaller than this in magnitude are
/// considered singular.
const SINGULAR_EPS: f64 = 1e-12;

macro_rules! impl_mat {
    ($Mat:ident, $Vec:ident, $n:literal) => {
        impl $Mat {
            /// Returns a matrix with the given rows.
            #[inline]
            pub const fn new(rows: [[f64; $n]; $n]) -> Self {
                Self(rows)
            }

            /// Returns the identity matrix.
            pub fn identity() -> Self {
                Self(from_fn(|i| from_fn(|j| if i == j { 1.0 } else { 0.0 })))
            }

            /// Returns a matrix with the given row vectors.
            pub fn from_rows(rows: [$Vec; $n]) -> Self {
                Self(rows.map(Into::into))
            }

            /// Returns a matrix with the given column vectors.
            pub fn from_cols(cols: [$Vec; $n]) -> Self {
                Self::from_rows(cols).transpose()
            }

            /// Returns the row at index `i`.
            ///
            /// # Panics
            /// If `i` is out of bounds.
            #[inline]
            pub fn row(&self, i: usize) -> $Vec {
                self.0[i].into()
            }

            /// Returns the column at index `j`.
            ///
            /// # Panics
            /// If `j` is out of bounds.
            #[inline]
            pub fn col(&self, j: usize) -> $Vec {
                from_fn::<_, $n, _>(|i| self.0[i][j]).into()
            }

            /// Returns the transpose of `self`: rows become columns
            /// and vice versa.
            #[must_use]
            pub fn transpose(&self) -> Self {
                Self(from_fn(|i| from_fn(|j| self.0[j][i])))
            }

            /// Returns the vector `v` transformed by `self`.
            #[inline]
            pub fn apply(&self, v: $Vec) -> $Vec {
                from_fn::<_, $n, _>(|i| self.row(i).dot(v)).into()
            }

            /// Returns the adjugate of `self`, the transpose of its
            /// cofactor matrix.
            #[must_use]
            pub fn adjugate(&self) -> Self {
                self.cofactor().transpose()
            }

            /// Returns the inverse of `self`, computed as adjugate / det.
            ///
            /// # Panics
            /// If `self` is singular, that is, if its determinant is zero
            /// or nearly so. See [`Self::checked_inverse`].
            #[must_use]
            pub fn inverse(&self) -> Self {
                let det = self.determinant();
                assert!(is_regular(det), "singular matrix: det = {det}");
                self.adjugate() * (1.0 / det)
            }

            /// Returns the inverse of `self`, or `None` if `self` is singular.
            pub fn checked_inverse(&self) -> Option<Self> {
                let det = self.determinant();
                is_regular(det).then(|| self.adjugate() * (1.0 / det))
            }

            /// Returns the transpose of the inverse of `self`.
            ///
            /// This is the matrix that transforms normal vectors when points
            /// are transformed by `self`. Computed directly as cofactor / det,
            /// skipping the two transpositions.
            ///
            /// # Panics
            /// If `self` is singular.
            #[must_use]
            pub fn invert_transpose(&self) -> Self {
                let det = self.determinant();
                assert!(is_regular(det), "singular matrix: det = {det}");
                self.cofactor() * (1.0 / det)
            }

            /// Returns the transpose of the inverse of `self`, or `None`
            /// if `self` is singular.
            pub fn checked_invert_transpose(&self) -> Option<Self> {
                let det = self.determinant();
                is_regular(det).then(|| self.cofactor() * (1.0 / det))
            }
        }

        impl Default for $Mat {
            /// Returns the identity matrix.
            fn default() -> Self {
                Self::identity()
            }
        }

        impl Mul for $Mat {
            type Output = Self;

            /// Returns the matrix product of `self` and `rhs`.
            fn mul(self, rhs: Self) -> Self {
                Self(from_fn(|i| from_fn(|j| self.row(i).dot(rhs.col(j)))))
            }
        }
        impl Mul<&$Mat> for &$Mat {
            type Output = $Mat;

            fn mul(self, rhs: &$Mat) -> $Mat {
                *self * *rhs
            }
        }
        impl MulAssign for $Mat {
            fn mul_assign(&mut self, rhs: Self) {
                *self = *self * rhs;
            }
        }

        impl Mul<f64> for $Mat {
            type Output = Self;

            /// Returns `self` with every element multiplied by `rhs`.
            fn mul(self, rhs: f64) -> Self {
                Self(self.0.map(|row| row.map(|e| e * rhs)))
            }
        }

        impl Mul<$Vec> for $Mat {
            type Output = $Vec;

            fn mul(self, rhs: $Vec) -> $Vec {
                self.apply(rhs)
            }
        }
        impl Mul<$Vec> for &$Mat {
            type Output = $Vec;

            fn mul(self, rhs: $Vec) -> $Vec {
                self.apply(rhs)
            }
        }

        impl ApproxEq for $Mat {
            fn approx_eq_eps(&self, other: &Self, eps: f64) -> bool {
                self.0.approx_eq_eps(&other.0, eps)
            }
        }

        impl Debug for $Mat {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                writeln!(f, "{}", stringify!($Mat))?;
                for row in &self.0 {
                    writeln!(f, "  {row:>6.2?}")?;
                }
                Ok(())
            }
        }
    };
}

impl_mat!(Mat2, Vec2, 2);
impl_mat!(Mat3, Vec3, 3);
impl_mat!(Mat4, Vec4, 4);

fn is_regular(det: f64) -> bool {
    use super::float::f64;
    det.is_finite() && f64::abs(det) > SINGULAR_EPS
}

impl Mat2 {
    /// Returns the determinant of `self`.
    pub fn determinant(&self) -> f64 {
        let [[a, b], [c, d]] = self.0;
        a * d - b * c
    }

    /// Returns the matrix of cofactors of `self`.
    #[must_use]
    pub fn cofactor(&self) -> Self {
        let [[a, b], [c, d]] = self.0;
        Self([[d, -c], [-b, a]])
    }
}

impl Mat3 {
    /// Returns the determinant of `self`.
    ///
    /// Equals the scalar triple product of the rows. If the rows are
    /// `(x, y, 1)` for the three vertices of a 2D triangle, this is twice
    /// its signed area, positive if the vertices are counter-clockwise.
    pub fn determinant(&self) -> f64 {
        self.row(0).dot(self.row(1).cross(self.row(2)))
    }

    /// Returns the matrix of cofactors of `self`.
    ///
    /// Each row is the cross product of the other two rows, in cyclic order.
    #[must_use]
    pub fn cofactor(&self) -> Self {
        let [r0, r1, r2] = [self.row(0), self.row(1), self.row(2)];
        Self::from_rows([r1.cross(r2), r2.cross(r0), r0.cross(r1)])
    }
}

impl Mat4 {
    /// Returns the 3×3 matrix left after removing row `i` and column `j`.
    pub fn minor(&self, i: usize, j: usize) -> Mat3 {
        let skip = |k: usize, s: usize| if k < s { k } else { k + 1 };
        Mat3(from_fn(|r| from_fn(|c| self.0[skip(r, i)][skip(c, j)])))
    }

    /// Returns the determinant of `self`, by cofactor expansion along
    /// the first row.
    pub fn determinant(&self) -> f64 {
        (0..4)
            .map(|j| self.0[0][j] * sign(0, j) * self.minor(0, j).determinant())
            .sum()
    }

    /// Returns the matrix of cofactors of `self`.
    #[must_use]
    pub fn cofactor(&self) -> Self {
        Self(from_fn(|i| {
            from_fn(|j| sign(i, j) * self.minor(i, j).determinant())
        }))
    }

    /// Returns the point `p` transformed by `self`, with an implicit `w` of 1.
    ///
    /// The `w` component of the result is discarded, so this is meant
    /// for affine transforms.
    #[inline]
    pub fn apply_pt(&self, p: Vec3) -> Vec3 {
        self.apply(p.to_pt()).xyz()
    }

    /// Returns the direction `d` transformed by `self`, with an implicit
    /// `w` of 0. Translations do not affect directions.
    #[inline]
    pub fn apply_dir(&self, d: Vec3) -> Vec3 {
        self.apply(d.to_dir()).xyz()
    }
}

fn sign(i: usize, j: usize) -> f64 {
    if (i + j) % 2 == 0 { 1.0 } else { -1.0 }
}

/// Returns a matrix that translates points by `t`.
pub fn translate(t: Vec3) -> Mat4 {
    Mat4::from_rows([
        vec4(1.0, 0.0, 0.0, t.x),
        vec4(0.0, 1.0, 0.0, t.y),
        vec4(0.0, 0.0, 1.0, t.z),
        vec4(0.0, 0.0, 0.0, 1.0),
    ])
}

/// Returns a matrix that scales points by the components of `s`.
pub fn scale(s: Vec3) -> Mat4 {
    Mat4::from_rows([
        vec4(s.x, 0.0, 0.0, 0.0),
        vec4(0.0, s.y, 0.0, 0.0),
        vec4(0.0, 0.0, s.z, 0.0),
        vec4(0.0, 0.0, 0.0, 1.0),
    ])
}
