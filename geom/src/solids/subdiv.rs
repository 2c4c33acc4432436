//! Subdivision surfaces.

use alloc::{collections::BTreeMap, vec::Vec};

use sr::geom::{Mesh, mesh::Builder};
use sr::math::{Vec3, vec2, vec3};

/// Spherical mesh created by recursively subdividing an octahedron.
///
/// Every subdivision step quadruples the number of faces, starting from
/// eight. Texture coordinates are a planar projection along the z axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Octosphere {
    pub radius: f64,
    pub depth: u32,
}

const COORDS: [Vec3; 6] = [
    vec3(0.0, 1.0, 0.0),
    vec3(1.0, 0.0, 0.0),
    vec3(0.0, 0.0, -1.0),
    vec3(-1.0, 0.0, 0.0),
    vec3(0.0, 0.0, 1.0),
    vec3(0.0, -1.0, 0.0),
];

#[rustfmt::skip]
const FACES: [[usize; 3]; 8] = [
    [0, 4, 1], [0, 1, 2], [0, 2, 3], [0, 3, 4],
    [5, 1, 4], [5, 2, 1], [5, 3, 2], [5, 4, 3],
];

impl Octosphere {
    /// Builds the sphere mesh.
    pub fn build(self) -> Mesh {
        let mut s = Subdiv {
            bld: Mesh::builder(),
            units: Vec::new(),
            radius: self.radius,
        };
        for c in COORDS {
            s.push(c);
        }
        s.subdivide(&FACES, &mut BTreeMap::new(), self.depth);
        s.bld.build()
    }
}

struct Subdiv {
    bld: Builder,
    /// Unit-length positions of the vertices pushed so far.
    units: Vec<Vec3>,
    radius: f64,
}

impl Subdiv {
    fn push(&mut self, unit: Vec3) -> usize {
        let uv = vec2(unit.x + 1.0, unit.y + 1.0) / 2.0;
        self.bld.push_vert(unit * self.radius, unit, uv);
        self.units.push(unit);
        self.units.len() - 1
    }

    /// Splits each face into four `depth` times over, then adds the
    /// resulting faces to the mesh.
    ///
    /// Each split adds a vertex at the midpoint of every edge, moved out
    /// onto the sphere, and connects the midpoints:
    ///
    /// ```text
    ///         i
    ///        / \
    ///      ij---ik
    ///      / \ / \
    ///     j---jk---k
    /// ```
    /// Midpoints are keyed by their sorted edge in `mids`, so that the two
    /// faces sharing an edge also share its midpoint.
    fn subdivide(
        &mut self,
        faces: &[[usize; 3]],
        mids: &mut BTreeMap<[usize; 2], usize>,
        depth: u32,
    ) {
        if depth == 0 {
            self.bld.push_faces(faces.iter().copied());
            return;
        }
        for &[i, j, k] in faces {
            let mut mid = |a: usize, b: usize| {
                let key = [a.min(b), a.max(b)];
                match mids.get(&key) {
                    Some(&m) => m,
                    None => {
                        let unit = (self.units[a] + self.units[b]).normalize();
                        let m = self.push(unit);
                        mids.insert(key, m);
                        m
                    }
                }
            };
            let [ij, ik, jk] = [mid(i, j), mid(i, k), mid(j, k)];
            let split = [[i, ij, ik], [ij, j, jk], [ik, jk, k], [ij, jk, ik]];
            self.subdivide(&split, mids, depth - 1);
        }
    }
}
