//! Turning 3D geometry into raster images.
//!
//! This module constitutes the core 3D rendering pipeline of `softrast`.
//! It contains code for [transforming][cam], [shading][shader],
//! [texturing][tex], [rasterizing][raster], and [outputting][target]
//! triangles.
//!
//! The pipeline is driven one face at a time. For each face, the vertex
//! stage of the bound [`Shader`] is called for vertices 0, 1 and 2 in
//! order, producing a triangle in clip space. The triangle is then handed
//! to the [rasterizer][raster::tri] together with the fragment stage of the
//! same shader. A triangle is always rasterized completely before the next
//! one is started, as the depth test and write of each pixel must not
//! interleave with those of another triangle.

use crate::geom::Tri;
use crate::math::Vec4;

pub use cam::Camera;
pub use ctx::{Context, FillRule};
pub use raster::{Frag, ScreenPt};
pub use shader::{FragmentShader, Shader, VertexShader};
pub use stats::{Stats, Throughput};
pub use target::{DepthBuf, Framebuf, Target};
pub use tex::{SamplerClamp, TexCoord, Texture, uv};

pub mod cam;
pub mod ctx;
pub mod raster;
pub mod shader;
pub mod shaders;
pub mod stats;
pub mod target;
pub mod tex;

/// Vertex position in clip space, the output of a vertex shader.
///
/// After the perspective divide by `w`, points inside the view volume
/// have coordinates within `[-1, 1]`.
pub type ClipVec = Vec4;

/// Renders `nfaces` faces with `shader` into `fb`.
///
/// For each face in order, calls the vertex stage of `shader` for each of
/// the three vertices of the face, and then rasterizes the resulting
/// triangle using the fragment stage, the viewport of `cam` and the
/// settings in `ctx`.
///
/// Returns the statistics of this call, which are also added to
/// `ctx.stats`. The frame count is left to the caller to increment.
pub fn render<Sh, Col>(
    nfaces: usize,
    shader: &mut Sh,
    cam: &Camera,
    fb: &mut Framebuf<Col>,
    ctx: &Context,
) -> Stats
where
    Sh: Shader + ?Sized,
    Col: Target,
{
    let mut stats = Stats::start();
    stats.calls = 1.0;

    for face in 0..nfaces {
        let clip = Tri([0, 1, 2].map(|vert| shader.shade_vertex(face, vert)));
        stats.prims.i += 1;
        stats.verts.i += 3;

        if let Some(frags) = raster::tri(&clip, &*shader, &cam.viewport, fb, ctx)
        {
            stats.prims.o += 1;
            stats.verts.o += 3;
            stats.frags += frags;
        }
    }
    let stats = stats.finish();
    *ctx.stats.borrow_mut() += stats.clone();
    stats
}

/// Renders `nfaces` faces with `shader` into a new framebuffer of the
/// camera's dimensions, cleared according to `ctx`.
pub fn render_to_buf<Sh>(
    nfaces: usize,
    shader: &mut Sh,
    cam: &Camera,
    ctx: &Context,
) -> Framebuf
where
    Sh: Shader + ?Sized,
{
    let mut fb = Framebuf::new(cam.dims);
    fb.clear(ctx);
    render(nfaces, shader, cam, &mut fb, ctx);
    fb
}
