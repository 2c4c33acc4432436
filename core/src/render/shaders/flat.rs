//! Flat shading.

use crate::geom::{Model, Tri};
use crate::math::{Color3, Color3f, Vec3, bary};
use crate::render::shader::{FragmentShader, MaybeSync, VertexShader};
use crate::render::{Camera, ClipVec, Frag};

use super::{BASE_COLOR, Light, shade};

/// Shades each face with a single normal computed from its eye-space
/// vertices, giving the model a faceted look.
///
/// Vertex normals and texture coordinates of the model are ignored.
#[derive(Clone, Debug)]
pub struct FlatShader<'a, M> {
    model: &'a M,
    cam: Camera,
    light: Light,
    color: Color3f,
    /// Eye-space vertices of the current face.
    eye: [Vec3; 3],
}

impl<'a, M: Model> FlatShader<'a, M> {
    /// Returns a flat shader rendering `model` as seen by `cam`, lit from
    /// the world-space direction `light_dir`.
    pub fn new(cam: &Camera, model: &'a M, light_dir: Vec3) -> Self {
        Self {
            model,
            cam: *cam,
            light: Light::new(cam, light_dir),
            color: BASE_COLOR,
            eye: [Vec3::ZERO; 3],
        }
    }

    /// Returns `self` with the light replaced by `light`.
    #[must_use]
    pub fn with_light(self, light: Light) -> Self {
        Self { light, ..self }
    }

    /// Returns `self` with the surface color replaced by `color`.
    #[must_use]
    pub fn with_color(self, color: Color3f) -> Self {
        Self { color, ..self }
    }
}

impl<M: Model> VertexShader for FlatShader<'_, M> {
    fn shade_vertex(&mut self, face: usize, vert: usize) -> ClipVec {
        let p = self.cam.modelview.apply_pt(self.model.vert(face, vert));
        self.eye[vert] = p;
        self.cam.project.apply(p.to_pt())
    }
}

impl<M: MaybeSync> FragmentShader for FlatShader<'_, M> {
    fn shade_fragment(&self, frag: Frag) -> Option<Color3> {
        // Degenerate faces are culled before reaching here
        let n = Tri(self.eye).normal()?;
        let view = self.cam.view_dir(bary(self.eye, frag.bar));
        Some(shade(self.color, self.light.intensity(n, view, 1.0)))
    }
}

#[cfg(test)]
mod tests {
    use crate::math::{rgb, rgbf, vec3};

    use super::super::tests::{camera, draw, quad};
    use super::*;

    #[test]
    fn front_lit_saturates() {
        let q = quad();
        let mut sh = FlatShader::new(&camera(), &q, Vec3::Z);
        let fb = draw(&mut sh);

        assert_eq!(fb.color_buf[[16, 16]], Color3::WHITE);
        assert_eq!(fb.color_buf[[2, 2]], Color3::BLACK);
    }

    #[test]
    fn back_lit_is_ambient_only() {
        let q = quad();
        let mut sh = FlatShader::new(&camera(), &q, -Vec3::Z);
        let fb = draw(&mut sh);

        // 0.1 * (1.0, 0.8, 0.7) * 255, truncated
        assert_eq!(fb.color_buf[[12, 20]], rgb(25, 20, 17));
    }

    #[test]
    fn faces_are_uniform_without_specular() {
        let q = quad();
        let cam = camera();
        let light = Light::new(&cam, vec3(1.0, 1.0, 1.0)).with_specular(0.0, 1);
        let mut sh = FlatShader::new(&cam, &q, Vec3::Z)
            .with_light(light)
            .with_color(rgbf(0.5, 0.5, 0.5));
        let fb = draw(&mut sh);

        let c = fb.color_buf[[10, 12]];
        assert_ne!(c, Color3::BLACK);
        assert_eq!(fb.color_buf[[12, 21]], c);
        assert_eq!(fb.color_buf[[21, 12]], c);
    }
}
