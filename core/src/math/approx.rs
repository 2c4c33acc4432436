//! Approximate equality of floating-point values.
//!
//! Rendering math accumulates rounding error quickly: the product of a
//! few matrices is rarely exactly what it would be in ℝ. Comparisons in
//! tests and in geometric predicates should therefore allow for a small
//! error relative to the magnitude of the values compared.

/// The default relative tolerance of [`ApproxEq::approx_eq`].
pub const EPSILON: f64 = 1e-9;

/// Equality up to a relative tolerance.
pub trait ApproxEq {
    /// Returns whether `self` and `other` differ by at most `eps` times
    /// the magnitude of `self`, or by at most `eps` if the magnitude is
    /// less than one.
    fn approx_eq_eps(&self, other: &Self, eps: f64) -> bool;

    /// Returns whether `self` and `other` are equal up to [`EPSILON`].
    fn approx_eq(&self, other: &Self) -> bool {
        self.approx_eq_eps(other, EPSILON)
    }
}

impl ApproxEq for f64 {
    fn approx_eq_eps(&self, other: &Self, eps: f64) -> bool {
        use super::float::f64;
        // NaNs fail this comparison, as they should
        f64::abs(self - other) <= eps * f64::abs(*self).max(1.0)
    }
}

impl<T: ApproxEq, const N: usize> ApproxEq for [T; N] {
    fn approx_eq_eps(&self, other: &Self, eps: f64) -> bool {
        self.iter()
            .zip(other)
            .all(|(a, b)| a.approx_eq_eps(b, eps))
    }
}

impl<T: ApproxEq> ApproxEq for Option<T> {
    fn approx_eq_eps(&self, other: &Self, eps: f64) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.approx_eq_eps(b, eps),
            (a, b) => a.is_none() && b.is_none(),
        }
    }
}

/// Asserts that two values are equal up to a relative tolerance.
///
/// The tolerance defaults to [`EPSILON`][math::approx::EPSILON] and can
/// be overridden with an `eps = ...` argument. A custom panic message
/// with format arguments may follow, as with [`assert!`]. Without one,
/// both values must implement `Debug`.
///
/// # Examples
/// ```
/// # use softrast_core::assert_approx_eq;
/// assert_ne!(0.1 + 0.2, 0.3);
/// assert_approx_eq!(0.1 + 0.2, 0.3);
/// assert_approx_eq!(100.0, 100.5, eps = 0.01);
/// let i = 7;
/// assert_approx_eq!(1.0 / 3.0, 0.3333, eps = 1e-3, "row {i}");
/// ```
///
/// [math::approx::EPSILON]: crate::math::approx::EPSILON
#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr $(,)?) => {
        $crate::assert_approx_eq!($a, $b, eps = $crate::math::approx::EPSILON)
    };
    ($a:expr, $b:expr, eps = $eps:expr $(,)?) => {
        match (&$a, &$b) {
            (a, b) => $crate::assert_approx_eq!(
                *a, *b, eps = $eps,
                "values not approximately equal (eps = {:e})\n  left: {:?}\n right: {:?}",
                $eps, a, b
            ),
        }
    };
    ($a:expr, $b:expr, $fmt:literal $(, $args:expr)* $(,)?) => {
        $crate::assert_approx_eq!(
            $a, $b, eps = $crate::math::approx::EPSILON, $fmt $(, $args)*
        )
    };
    ($a:expr, $b:expr, eps = $eps:expr, $fmt:literal $(, $args:expr)* $(,)?) => {
        match (&$a, &$b) {
            (a, b) => assert!(
                $crate::math::approx::ApproxEq::approx_eq_eps(a, b, $eps),
                $fmt $(, $args)*
            ),
        }
    };
}
