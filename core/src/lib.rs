//! Core functionality of the `softrast` project.
//!
//! A CPU-only triangle rasterizer: a small linear algebra library with
//! vectors and matrices; a camera that builds the model-view, perspective
//! and viewport transforms; a clip-space rasterizer with perspective-correct
//! interpolation and z-buffering; and a shader abstraction that lets many
//! shading algorithms share one rasterization loop.
//!
//! # Crate features
//!
//! * `std`:
//!   Makes available items requiring I/O or timekeeping, and uses the
//!   floating-point functions of `std`.
//!
//!   If this feature is disabled, the crate only depends on `alloc`.
//!
//! * `libm`:
//!   Provides software implementations of floating-point functions via the
//!   [libm](https://crates.io/crates/libm) crate.
//!
//! * `parallel`:
//!   Scans the pixels covered by each triangle in parallel using
//!   [rayon](https://crates.io/crates/rayon). Implies `std`.
//!
//! All features are disabled by default. Without `std` or `libm`, simple
//! fallback implementations of the needed float functions are used.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;
extern crate core;

pub mod geom;
pub mod math;
pub mod render;
pub mod util;

pub mod prelude {
    pub use crate::math::{
        ApproxEq, Color3, Color3f, Mat2, Mat3, Mat4, Vec2, Vec3, Vec4, bary,
        color::gray, rgb, rgbf, scale, translate, vec2, vec3, vec4,
    };

    pub use crate::geom::{Mesh, MeshVertex, Model, Tri, Vertex, tri, vertex};

    pub use crate::render::{
        Camera, ClipVec, Context, FillRule, Frag, Framebuf, Shader, Stats,
        Target, Texture, render, uv,
    };

    pub use crate::util::{Dims, buf::Buf2};
}
