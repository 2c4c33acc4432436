//! Various utility types and functions.

pub mod buf;
#[cfg(feature = "std")]
pub mod pnm;

/// Width and height of a two-dimensional buffer or render target.
pub type Dims = (usize, usize);
