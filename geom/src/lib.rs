//! Procedural meshes for `softrast`.
//!
//! The meshes implement [`Model`][sr::geom::Model] and can be rendered
//! with any of the shaders of `softrast-core`.

#![no_std]

extern crate alloc;
extern crate core;
#[cfg(feature = "std")]
extern crate std;

pub mod solids;
