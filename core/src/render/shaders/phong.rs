//! Phong shading with interpolated vertex normals.

use crate::geom::Model;
use crate::math::{Color3, Color3f, Vec3, bary};
use crate::render::shader::{FragmentShader, MaybeSync, VertexShader};
use crate::render::tex::{TexCoord, Texture};
use crate::render::{Camera, ClipVec, Frag};

use super::{Light, diffuse_color, specular_intensity};

/// Shades each pixel with a normal interpolated from the vertex normals of
/// the model, giving curved surfaces a smooth look.
///
/// Surface color is read from an optional diffuse texture and specular
/// intensity from an optional specular map. Highlights are white.
#[derive(Clone, Debug)]
pub struct PhongShader<'a, M> {
    model: &'a M,
    cam: Camera,
    light: Light,
    diffuse: Option<&'a Texture>,
    specular: Option<&'a Texture>,
    eye: [Vec3; 3],
    nrm: [Vec3; 3],
    uv: [TexCoord; 3],
}

impl<'a, M: Model> PhongShader<'a, M> {
    /// Returns a Phong shader rendering `model` as seen by `cam`, lit from
    /// the world-space direction `light_dir`.
    pub fn new(cam: &Camera, model: &'a M, light_dir: Vec3) -> Self {
        Self {
            model,
            cam: *cam,
            light: Light::new(cam, light_dir).with_ambient(0.3),
            diffuse: None,
            specular: None,
            eye: [Vec3::ZERO; 3],
            nrm: [Vec3::ZERO; 3],
            uv: [TexCoord::ZERO; 3],
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

impl<M: Model> VertexShader for PhongShader<'_, M> {
    fn shade_vertex(&mut self, face: usize, vert: usize) -> ClipVec {
        let m = self.model;
        let p = self.cam.modelview.apply_pt(m.vert(face, vert));
        self.eye[vert] = p;
        self.nrm[vert] = self.cam.normal.apply_dir(m.normal(face, vert));
        self.uv[vert] = m.uv(face, vert);
        self.cam.project.apply(p.to_pt())
    }
}

impl<M: MaybeSync> FragmentShader for PhongShader<'_, M> {
    fn shade_fragment(&self, frag: Frag) -> Option<Color3> {
        let bar = frag.bar;
        let view = self.cam.view_dir(bary(self.eye, bar));
        let n = bary(self.nrm, bar).try_normalize().unwrap_or(view);
        let uv = bary(self.uv, bar);

        let l = &self.light;
        let base = diffuse_color(self.diffuse, uv);
        let spec =
            specular_intensity(self.specular, uv) * l.specular_term(n, view);
        let c = base * (l.ambient + l.diffuse_term(n)) + Color3f::WHITE * spec;
        Some(c.to_color3())
    }
}
