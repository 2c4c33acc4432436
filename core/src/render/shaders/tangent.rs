//! Shading with a tangent-space normal map.

use crate::geom::{Model, Tri};
use crate::math::{Color3, Mat2, Vec3, bary};
use crate::render::shader::{FragmentShader, MaybeSync, VertexShader};
use crate::render::tex::{SamplerClamp, TexCoord, Texture, decode_normal};
use crate::render::{Camera, ClipVec, Frag};

use super::{Light, diffuse_color, shade, specular_intensity};

/// Shades each pixel with a normal read from a tangent-space normal map.
///
/// Unlike an object-space map, a tangent-space map stores normals relative
/// to the surface: the z axis of each texel points along the interpolated
/// vertex normal, and the x and y axes along the directions in which the
/// u and v texture coordinates increase. This *Darboux frame* is computed
/// per triangle from its eye-space edges and texture coordinate deltas.
#[derive(Clone, Debug)]
pub struct TangentShader<'a, M> {
    model: &'a M,
    cam: Camera,
    light: Light,
    normal_map: &'a Texture,
    diffuse: Option<&'a Texture>,
    specular: Option<&'a Texture>,
    eye: [Vec3; 3],
    nrm: [Vec3; 3],
    uv: [TexCoord; 3],
    /// Unit tangent and bitangent of the current face, or `None` if its
    /// texture coordinates are degenerate.
    frame: Option<[Vec3; 2]>,
}

impl<'a, M: Model> TangentShader<'a, M> {
    /// Returns a tangent-space normal mapping shader rendering `model` as
    /// seen by `cam`, lit from the world-space direction `light_dir`.
    pub fn new(
        cam: &Camera,
        model: &'a M,
        normal_map: &'a Texture,
        light_dir: Vec3,
    ) -> Self {
        let light = Light::new(cam, light_dir)
            .with_ambient(0.4)
            .with_specular(3.0, 35);
        Self {
            model,
            cam: *cam,
            light,
            normal_map,
            diffuse: None,
            specular: None,
            eye: [Vec3::ZERO; 3],
            nrm: [Vec3::ZERO; 3],
            uv: [TexCoord::ZERO; 3],
            frame: None,
        }
    }

    /// Returns `self` with the light replaced by `light`.
    #[must_use]
    pub fn with_light(self, light: Light) -> Self {
        Self { light, ..self }
    }

    /// Returns `self` with surface colors read from `tex`.
    #[must_use]
    pub fn with_diffuse(self, tex: &'a Texture) -> Self {
        Self { diffuse: Some(tex), ..self }
    }

    /// Returns `self` with specular intensities read from `tex`.
    #[must_use]
    pub fn with_specular(self, tex: &'a Texture) -> Self {
        Self { specular: Some(tex), ..self }
    }
}

/// Returns the unit tangent and bitangent of the triangle with eye-space
/// vertices `eye` and texture coordinates `uv`.
///
/// Solves `E = U T` for the 2×3 matrix `T`, where the rows of `E` are the
/// edge vectors of the triangle and the rows of `U` the corresponding
/// texture coordinate deltas.
fn darboux(eye: [Vec3; 3], uv: [TexCoord; 3]) -> Option<[Vec3; 2]> {
    let [e1, e2] = Tri(eye).tangents();
    let u = Mat2::from_rows([uv[1] - uv[0], uv[2] - uv[0]]).checked_inverse()?;
    let [[a, b], [c, d]] = u.0;
    let t = (e1 * a + e2 * b).try_normalize()?;
    let bt = (e1 * c + e2 * d).try_normalize()?;
    Some([t, bt])
}

impl<M: Model> VertexShader for TangentShader<'_, M> {
    fn shade_vertex(&mut self, face: usize, vert: usize) -> ClipVec {
        let m = self.model;
        let p = self.cam.modelview.apply_pt(m.vert(face, vert));
        self.eye[vert] = p;
        self.nrm[vert] = self.cam.normal.apply_dir(m.normal(face, vert));
        self.uv[vert] = m.uv(face, vert);
        if vert == 2 {
            self.frame = darboux(self.eye, self.uv);
        }
        self.cam.project.apply(p.to_pt())
    }
}

impl<M: MaybeSync> FragmentShader for TangentShader<'_, M> {
    fn shade_fragment(&self, frag: Frag) -> Option<Color3> {
        let bar = frag.bar;
        let uv = bary(self.uv, bar);
        let view = self.cam.view_dir(bary(self.eye, bar));
        let n = bary(self.nrm, bar).try_normalize().unwrap_or(view);

        let n = match self.frame {
            Some([t, b]) => {
                let texel = SamplerClamp.sample(self.normal_map, uv);
                let nt = decode_normal(texel);
                (t * nt.x + b * nt.y + n * nt.z).try_normalize().unwrap_or(n)
            }
            None => n,
        };

        let spec = specular_intensity(self.specular, uv);
        let i = self.light.intensity(n, view, spec);
        Some(shade(diffuse_color(self.diffuse, uv), i))
    }
}
