//! Triangle meshes.

use alloc::{vec, vec::Vec};
use core::fmt::{self, Debug, Formatter};

use crate::math::{Mat4, Vec2, Vec3};

use super::{Model, Tri, Vertex, vertex};

/// Per-vertex attributes of a mesh vertex.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Attrib {
    /// The surface normal at the vertex, in object space.
    pub normal: Vec3,
    /// The texture coordinate of the vertex.
    pub uv: Vec2,
}

/// Convenience type alias for a mesh vertex.
pub type MeshVertex = Vertex<Vec3, Attrib>;

/// An indexed triangle mesh.
///
/// Vertices are stored once and referenced by index from each face, so a
/// vertex shared by several faces is stored (and transformed) only once.
#[derive(Clone, Default)]
pub struct Mesh {
    /// Index triplets into `verts`, one per face, in counter-clockwise
    /// order when seen from the front.
    pub faces: Vec<Tri<usize>>,
    /// Positions and attributes of the vertices.
    pub verts: Vec<MeshVertex>,
}

/// Collects faces and vertices for a [`Mesh`].
///
/// Faces may refer to vertices not pushed yet; indices are only checked
/// when the mesh is built.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    m: Mesh,
}

impl Mesh {
    /// Returns a mesh made of `faces` indexing into `verts`.
    ///
    /// # Examples
    /// ```
    /// # use softrast_core::geom::{Mesh, Model, Tri, mesh::Attrib, vertex};
    /// # use softrast_core::math::vec3;
    /// let pos = [vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0)];
    /// let tri = Mesh::new([Tri([0, 1, 2])], pos.map(|p| vertex(p, Attrib::default())));
    /// assert_eq!(tri.nfaces(), 1);
    /// ```
    ///
    /// # Panics
    /// If a face refers to a vertex index not in `verts`.
    pub fn new<F, V>(faces: F, verts: V) -> Self
    where
        F: IntoIterator<Item = Tri<usize>>,
        V: IntoIterator<Item = MeshVertex>,
    {
        let faces: Vec<_> = faces.into_iter().collect();
        let verts: Vec<_> = verts.into_iter().collect();
        if let Some((i, Tri(idx))) = faces
            .iter()
            .enumerate()
            .find(|(_, Tri(idx))| idx.iter().any(|&j| j >= verts.len()))
        {
            panic!("face {i} {idx:?} out of bounds, {} verts", verts.len());
        }
        Self { faces, verts }
    }

    /// Returns a new mesh builder.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns `self` with every vertex position transformed by `m`
    /// and every normal by the invert-transpose of `m`.
    ///
    /// # Panics
    /// If `m` is singular.
    #[must_use]
    pub fn transform(mut self, m: &Mat4) -> Self {
        let n = m.invert_transpose();
        for v in &mut self.verts {
            v.pos = m.apply_pt(v.pos);
            if let Some(normal) = n.apply_dir(v.attrib.normal).try_normalize() {
                v.attrib.normal = normal;
            }
        }
        self
    }

    /// Replaces the normals of `self` with smooth vertex normals, computed
    /// as the area-weighted average of the normals of adjacent faces.
    ///
    /// Vertices not belonging to any non-degenerate face keep their normal.
    #[must_use]
    pub fn with_vertex_normals(mut self) -> Self {
        let mut sums = vec![Vec3::ZERO; self.verts.len()];
        for Tri(idx) in &self.faces {
            let [a, b, c] = idx.map(|i| self.verts[i].pos);
            // Length is twice the face area
            let n = (b - a).cross(c - a);
            for i in idx {
                sums[*i] += n;
            }
        }
        for (v, sum) in self.verts.iter_mut().zip(sums) {
            if let Some(n) = sum.try_normalize() {
                v.attrib.normal = n;
            }
        }
        self
    }
}

impl Model for Mesh {
    fn nfaces(&self) -> usize {
        self.faces.len()
    }
    fn vert(&self, face: usize, vert: usize) -> Vec3 {
        self.verts[self.faces[face].0[vert]].pos
    }
    fn normal(&self, face: usize, vert: usize) -> Vec3 {
        self.verts[self.faces[face].0[vert]].attrib.normal
    }
    fn uv(&self, face: usize, vert: usize) -> Vec2 {
        self.verts[self.faces[face].0[vert]].attrib.uv
    }
}

impl Builder {
    /// Adds a face with vertex indices `a`, `b`, and `c`.
    pub fn push_face(&mut self, a: usize, b: usize, c: usize) {
        self.m.faces.push(Tri([a, b, c]));
    }

    /// Adds each index triplet in `faces` as a face.
    pub fn push_faces<Fs>(&mut self, faces: Fs)
    where
        Fs: IntoIterator<Item = [usize; 3]>,
    {
        self.m.faces.extend(faces.into_iter().map(Tri));
    }

    /// Adds a vertex. Its index is the value of
    /// [`vert_count`][Self::vert_count] before the call.
    pub fn push_vert(&mut self, pos: Vec3, normal: Vec3, uv: Vec2) {
        self.m.verts.push(vertex(pos, Attrib { normal, uv }));
    }

    /// Returns how many vertices have been added.
    pub fn vert_count(&self) -> usize {
        self.m.verts.len()
    }

    /// Returns the mesh.
    ///
    /// # Panics
    /// If a face refers to a vertex that was never added.
    pub fn build(self) -> Mesh {
        let Mesh { faces, verts } = self.m;
        Mesh::new(faces, verts)
    }
}

impl Debug for Mesh {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Mesh({} faces, {} verts)", self.faces.len(), self.verts.len())
    }
}
