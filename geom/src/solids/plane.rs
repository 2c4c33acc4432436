//! Flat rectangular grids.

use sr::geom::Mesh;
use sr::math::{Vec3, vec2, vec3};

/// A square grid on the xz plane, centered at the origin and facing +y.
///
/// Texture coordinates span the unit square, with u increasing along +x
/// and v along -z.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane {
    /// Half the side length.
    pub size: f64,
    /// Number of subdivisions along each side.
    pub divs: usize,
}

impl Plane {
    /// Builds the plane mesh.
    ///
    /// # Panics
    /// If `self.divs` is zero.
    pub fn build(self) -> Mesh {
        let Self { size, divs: n } = self;
        assert!(n > 0, "plane must have at least one division");

        let mut b = Mesh::builder();
        for j in 0..=n {
            for i in 0..=n {
                let (u, v) = (i as f64 / n as f64, j as f64 / n as f64);
                let (x, z) = (2.0 * u - 1.0, 1.0 - 2.0 * v);
                let pos = vec3(size * x, 0.0, size * z);
                b.push_vert(pos, Vec3::Y, vec2(u, v));
            }
        }
        for j in 0..n {
            for i in 0..n {
                let k = j * (n + 1) + i;
                // Counter-clockwise as seen from above
                let (r, s) = (k + n + 1, k + n + 2);
                b.push_faces([[k, k + 1, s], [k, s, r]]);
            }
        }
        b.build()
    }
}
