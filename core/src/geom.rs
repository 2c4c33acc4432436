//! Basic geometric primitives and the mesh provider interface.

use crate::math::{Vec2, Vec3};

pub use mesh::{Attrib, Mesh, MeshVertex};

pub mod mesh;

/// Vertex with a position and arbitrary other attributes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vertex<P, A> {
    pub pos: P,
    pub attrib: A,
}

/// Triangle, defined by three vertices.
///
/// The order of the vertices is significant: a triangle whose vertices
/// appear counter-clockwise on screen is front-facing.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[repr(transparent)]
pub struct Tri<V>(pub [V; 3]);

/// A source of triangle geometry.
///
/// Models are queried by shaders in their vertex stage, face by face and
/// vertex by vertex. Faces are numbered `0..self.nfaces()` and vertices
/// within a face `0..3`.
pub trait Model {
    /// Returns the number of faces of `self`.
    fn nfaces(&self) -> usize;

    /// Returns the object-space position of vertex `vert` of face `face`.
    fn vert(&self, face: usize, vert: usize) -> Vec3;

    /// Returns the object-space normal at vertex `vert` of face `face`.
    fn normal(&self, face: usize, vert: usize) -> Vec3;

    /// Returns the texture coordinate of vertex `vert` of face `face`.
    fn uv(&self, face: usize, vert: usize) -> Vec2;

    /// Returns the three vertex positions of face `face`.
    fn face(&self, face: usize) -> Tri<Vec3> {
        tri(self.vert(face, 0), self.vert(face, 1), self.vert(face, 2))
    }
}

/// Creates a `Vertex` with the give position and attribute values.
pub const fn vertex<P, A>(pos: P, attrib: A) -> Vertex<P, A> {
    Vertex { pos, attrib }
}

/// Creates a `Tri` with the given vertices.
pub const fn tri<V>(a: V, b: V, c: V) -> Tri<V> {
    Tri([a, b, c])
}

impl<V> Tri<V> {
    /// Returns a triangle with `f` applied to each vertex of `self`.
    pub fn map<U>(self, f: impl FnMut(V) -> U) -> Tri<U> {
        Tri(self.0.map(f))
    }
}

impl Tri<Vec2> {
    /// Returns the signed area of `self`.
    ///
    /// The area is positive if `self` is wound counter-clockwise.
    pub fn signed_area(&self) -> f64 {
        let [a, b, c] = self.0;
        (b - a).perp_dot(c - a) / 2.0
    }
}

impl Tri<Vec3> {
    /// Given a triangle ABC, returns the vectors [AB, AC].
    pub fn tangents(&self) -> [Vec3; 2] {
        let [a, b, c] = self.0;
        [b - a, c - a]
    }

    /// Returns the unit normal vector of `self`, or `None` if `self`
    /// is degenerate.
    ///
    /// The normal points toward the side from which the vertices appear
    /// counter-clockwise.
    ///
    /// # Examples
    /// ```
    /// use softrast_core::geom::tri;
    /// use softrast_core::math::Vec3;
    ///
    /// let t = tri(Vec3::ZERO, Vec3::X, Vec3::Y);
    /// assert_eq!(t.normal(), Some(Vec3::Z));
    /// ```
    pub fn normal(&self) -> Option<Vec3> {
        let [t, u] = self.tangents();
        t.cross(u).try_normalize()
    }
}

impl<M: Model + ?Sized> Model for &M {
    fn nfaces(&self) -> usize {
        (**self).nfaces()
    }
    fn vert(&self, face: usize, vert: usize) -> Vec3 {
        (**self).vert(face, vert)
    }
    fn normal(&self, face: usize, vert: usize) -> Vec3 {
        (**self).normal(face, vert)
    }
    fn uv(&self, face: usize, vert: usize) -> Vec2 {
        (**self).uv(face, vert)
    }
}
