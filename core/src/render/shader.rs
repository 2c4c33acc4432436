//! Fragment and vertex shaders.
//!
//! Shaders are functions that are used to customize vertex and fragment
//! handling during rendering.
//!
//! A *vertex shader* is responsible for transforming and projecting each
//! vertex of each face of the rendered model, usually using a modelview
//! matrix to move the vertex to the view (camera) space and a projection
//! matrix to transform it to the clip space. It is called three times per
//! face, for vertices 0, 1 and 2 in order, and may record per-vertex values
//! (*varyings*) such as normals or texture coordinates for the fragment
//! stage of the same face.
//!
//! A *fragment shader* is used to compute the color of each individual pixel,
//! or fragment, drawn to the render target. It receives the perspective-
//! correct barycentric weights of the fragment, with which it can interpolate
//! the varyings recorded by the vertex stage.

use crate::math::Color3;

use super::ClipVec;
use super::raster::Frag;

/// Trait for vertex shaders, used to transform vertices and perform other
/// per-vertex computations.
pub trait VertexShader {
    /// Returns the clip-space position of vertex `vert` (0, 1 or 2) of face
    /// `face`, recording any varyings needed by the fragment stage.
    ///
    /// # Panics
    /// `shade_vertex` should never panic.
    fn shade_vertex(&mut self, face: usize, vert: usize) -> ClipVec;
}

/// Trait for fragment shaders, used to compute the color of each individual
/// pixel, or fragment, rendered.
pub trait FragmentShader: MaybeSync {
    /// Computes the color of `frag`. Returns either `Some(color)`, or `None`
    /// if the fragment should be discarded.
    ///
    /// # Panics
    /// `shade_fragment` should never panic.
    fn shade_fragment(&self, frag: Frag) -> Option<Color3>;
}

/// A combined vertex and fragment shader.
///
/// The rasterizer is generic over this trait, and any type implementing
/// both stages can be rendered with. The concrete shading algorithms of
/// [`shaders`][super::shaders] are all `Shader`s.
pub trait Shader: VertexShader + FragmentShader {}

impl<S: VertexShader + FragmentShader> Shader for S {}

/// A marker trait for types that can be shared between the threads of the
/// parallel pixel scan.
///
/// Equivalent to [`Sync`] if the `parallel` feature is enabled; otherwise
/// implemented for all types.
#[cfg(feature = "parallel")]
pub trait MaybeSync: Sync {}
#[cfg(feature = "parallel")]
impl<T: Sync + ?Sized> MaybeSync for T {}

/// A marker trait for types that can be shared between the threads of the
/// parallel pixel scan.
///
/// Equivalent to [`Sync`] if the `parallel` feature is enabled; otherwise
/// implemented for all types.
#[cfg(not(feature = "parallel"))]
pub trait MaybeSync {}
#[cfg(not(feature = "parallel"))]
impl<T: ?Sized> MaybeSync for T {}

impl<F> VertexShader for F
where
    F: FnMut(usize, usize) -> ClipVec,
{
    fn shade_vertex(&mut self, face: usize, vert: usize) -> ClipVec {
        self(face, vert)
    }
}

impl<F, Out> FragmentShader for F
where
    F: Fn(Frag) -> Out + MaybeSync,
    Out: Into<Option<Color3>>,
{
    fn shade_fragment(&self, frag: Frag) -> Option<Color3> {
        self(frag).into()
    }
}

/// Returns a shader composed of the vertex shader `vs` and the fragment
/// shader `fs`.
///
/// # Examples
/// ```
/// use softrast_core::render::{Frag, shader};
/// use softrast_core::math::{Color3, Vec4};
///
/// let verts = [Vec4::ZERO; 3];
/// let sh = shader::new(
///     |_face: usize, vert: usize| verts[vert],
///     |_frag: Frag| Color3::WHITE,
/// );
/// ```
pub fn new<Vs, Fs>(vs: Vs, fs: Fs) -> Composed<Vs, Fs>
where
    Vs: VertexShader,
    Fs: FragmentShader,
{
    Composed {
        vertex_shader: vs,
        fragment_shader: fs,
    }
}

/// A type that composes a vertex and a fragment shader.
#[derive(Copy, Clone)]
pub struct Composed<Vs, Fs> {
    pub vertex_shader: Vs,
    pub fragment_shader: Fs,
}

impl<Vs: VertexShader, Fs> VertexShader for Composed<Vs, Fs> {
    fn shade_vertex(&mut self, face: usize, vert: usize) -> ClipVec {
        self.vertex_shader.shade_vertex(face, vert)
    }
}

impl<Vs: MaybeSync, Fs: FragmentShader> FragmentShader for Composed<Vs, Fs> {
    fn shade_fragment(&self, frag: Frag) -> Option<Color3> {
        self.fragment_shader.shade_fragment(frag)
    }
}
