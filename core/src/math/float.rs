//! Floating-point compatibility API.
//!
//! Most floating-point functions are unavailable in `no_std`. This module
//! provides the few that the renderer needs using the `libm` crate if the
//! feature of the same name is enabled. As a fallback, it also implements
//! them in plain `core` if neither `std` nor `libm` is enabled.
//!
//! Use as if calling inherent methods of `f64`:
//! ```
//! use softrast_core::math::float::f64;
//!
//! assert_eq!(f64::sqrt(9.0), 3.0);
//! assert_eq!(f64::floor(-1.5), -2.0);
//! ```

#[cfg(feature = "libm")]
pub mod libm {
    pub use libm::fabs as abs;
    pub use libm::floor;
    pub use libm::sqrt;

    #[inline]
    pub fn powi(x: f64, n: i32) -> f64 {
        libm::pow(x, n as f64)
    }
}

pub mod fallback {
    /// Returns the absolute value of `x`.
    #[inline]
    pub fn abs(x: f64) -> f64 {
        f64::from_bits(x.to_bits() & !(1 << 63))
    }
    /// Returns the largest integer less than or equal to `x`.
    ///
    /// Only valid for values representable as `i64`.
    #[inline]
    pub fn floor(x: f64) -> f64 {
        let t = x as i64 as f64;
        if t > x { t - 1.0 } else { t }
    }
    /// Returns the square root of `x`, or NaN if `x` is negative.
    #[inline]
    pub fn sqrt(x: f64) -> f64 {
        if x < 0.0 || x.is_nan() {
            return f64::NAN;
        }
        if x == 0.0 || x == f64::INFINITY {
            return x;
        }
        // Initial guess by halving the exponent, then Newton's method
        let mut y = f64::from_bits((x.to_bits() >> 1) + (1023 << 51));
        for _ in 0..6 {
            y = 0.5 * (y + x / y);
        }
        y
    }
    /// Returns `x` raised to the integer power `n`.
    #[inline]
    pub fn powi(x: f64, n: i32) -> f64 {
        let (mut base, mut exp) = (x, n.unsigned_abs());
        let mut res = 1.0;
        while exp > 0 {
            if exp & 1 == 1 {
                res *= base;
            }
            base *= base;
            exp >>= 1;
        }
        if n < 0 { 1.0 / res } else { res }
    }
}

#[cfg(feature = "std")]
#[allow(non_camel_case_types)]
pub type f64 = core::primitive::f64;

#[cfg(all(feature = "libm", not(feature = "std")))]
pub use libm as f64;

#[cfg(not(any(feature = "std", feature = "libm")))]
pub use fallback as f64;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn fallback_functions() {
        use fallback as fb;
        assert_eq!(fb::abs(-2.5), 2.5);
        assert_eq!(fb::abs(2.5), 2.5);
        assert_eq!(fb::abs(-0.0), 0.0);

        assert_eq!(fb::floor(1.5), 1.0);
        assert_eq!(fb::floor(0.99), 0.0);
        assert_eq!(fb::floor(-0.0), 0.0);
        assert_eq!(fb::floor(-1.1), -2.0);
        assert_eq!(fb::floor(-3.0), -3.0);

        assert_approx_eq!(fb::sqrt(9.0), 3.0);
        assert_approx_eq!(fb::sqrt(16.0), 4.0);
        assert_approx_eq!(fb::sqrt(2.0), core::f64::consts::SQRT_2);
        assert_approx_eq!(fb::sqrt(1e-8), 1e-4);
        assert_approx_eq!(fb::sqrt(1e12), 1e6);
        assert_eq!(fb::sqrt(0.0), 0.0);
        assert!(fb::sqrt(-1.0).is_nan());

        assert_eq!(fb::powi(3.0, 2), 9.0);
        assert_eq!(fb::powi(-3.0, 3), -27.0);
        assert_eq!(fb::powi(2.0, -2), 0.25);
        assert_eq!(fb::powi(0.5, 0), 1.0);
    }

    #[test]
    fn selected_functions() {
        assert_eq!(f64::abs(-1.25), 1.25);
        assert_eq!(f64::floor(2.75), 2.0);
        assert_approx_eq!(f64::sqrt(25.0), 5.0);
        assert_approx_eq!(f64::powi(0.9, 35), 0.025031555049932);
    }
}
