//! Two-pass shadow mapping.
//!
//! In the first pass, the scene is rendered from the viewpoint of the
//! light with a [`DepthShader`]. Only the resulting depth buffer, the
//! *shadow map*, is used. In the second pass, a [`ShadowShader`] renders
//! the scene from the viewpoint of the camera, projecting each fragment
//! into the screen space of the light and comparing its depth to the
//! depth stored in the shadow map. A fragment with something nearer to
//! the light in front of it is in shadow and receives ambient light only.

use crate::geom::Model;
use crate::math::{Color3, Mat4, Vec3, bary, rgbf};
use crate::render::shader::{FragmentShader, MaybeSync, VertexShader};
use crate::render::tex::{TexCoord, Texture};
use crate::render::{Camera, ClipVec, DepthBuf, Frag};

use super::{Light, diffuse_color, shade};

/// Renders the depth of a model as seen by a light.
///
/// Outputs a grayscale color proportional to the NDC depth of each
/// fragment, so the color buffer doubles as a visualization.
#[derive(Clone, Debug)]
pub struct DepthShader<'a, M> {
    model: &'a M,
    clip: Mat4,
}

impl<'a, M: Model> DepthShader<'a, M> {
    /// Returns a depth shader rendering `model` as seen by `light_cam`.
    pub fn new(light_cam: &Camera, model: &'a M) -> Self {
        Self {
            model,
            clip: light_cam.world_to_clip(),
        }
    }
}

impl<M: Model> VertexShader for DepthShader<'_, M> {
    fn shade_vertex(&mut self, face: usize, vert: usize) -> ClipVec {
        self.clip.apply(self.model.vert(face, vert).to_pt())
    }
}

impl<M: MaybeSync> FragmentShader for DepthShader<'_, M> {
    fn shade_fragment(&self, frag: Frag) -> Option<Color3> {
        let lum = (frag.pos.z + 1.0) / 2.0;
        Some(rgbf(lum, lum, lum).to_color3())
    }
}

/// Shades a model with a directional light that casts shadows.
///
/// The shadow map must have been rendered with a [`DepthShader`] from
/// the same light camera passed to [`ShadowShader::new`]. The light shines
/// along the viewing direction of the light camera.
#[derive(Clone, Debug)]
pub struct ShadowShader<'a, M> {
    model: &'a M,
    cam: Camera,
    light: Light,
    shadow_map: &'a DepthBuf,
    /// Camera eye space to light clip space.
    to_light: Mat4,
    light_viewport: Mat4,
    bias: f64,
    diffuse: Option<&'a Texture>,
    eye: [Vec3; 3],
    nrm: [Vec3; 3],
    uv: [TexCoord; 3],
}

impl<'a, M: Model> ShadowShader<'a, M> {
    /// Returns a shadow-mapping shader rendering `model` as seen by `cam`,
    /// lit by a light looking through `light_cam`.
    pub fn new(
        cam: &Camera,
        model: &'a M,
        light_cam: &Camera,
        shadow_map: &'a DepthBuf,
    ) -> Self {
        // The transpose of the normal matrix is the inverse model-view
        let to_world = cam.normal.transpose();
        // Toward the light, which sits on the +z axis of its eye space
        let light_dir = light_cam.normal.transpose().apply_dir(Vec3::Z);
        Self {
            model,
            cam: *cam,
            light: Light::new(cam, light_dir).with_ambient(0.2),
            shadow_map,
            to_light: light_cam.world_to_clip() * to_world,
            light_viewport: light_cam.viewport,
            bias: 1e-2,
            diffuse: None,
            eye: [Vec3::ZERO; 3],
            nrm: [Vec3::ZERO; 3],
            uv: [TexCoord::ZERO; 3],
        }
    }
}

impl<'a, M> ShadowShader<'a, M> {
    /// Returns `self` with the depth bias set to `bias`.
    ///
    /// A fragment is in shadow if the shadow map depth exceeds its own
    /// depth by more than `bias`. Too small a bias causes surfaces to
    /// shadow themselves.
    #[must_use]
    pub fn with_bias(self, bias: f64) -> Self {
        Self { bias, ..self }
    }

    /// Returns `self` with surface colors read from `tex`.
    #[must_use]
    pub fn with_diffuse(self, tex: &'a Texture) -> Self {
        Self { diffuse: Some(tex), ..self }
    }

    /// Returns 1 if the eye-space point `p` is visible from the light,
    /// 0 if it is in shadow.
    ///
    /// Points outside the shadow map are lit.
    pub fn lit(&self, p: Vec3) -> f64 {
        let Some(ndc) = self.to_light.apply(p.to_pt()).project() else {
            return 1.0;
        };
        let s = self.light_viewport.apply_pt(ndc);
        let (w, h) = self.shadow_map.dims();
        if !(s.x >= 0.0 && s.y >= 0.0 && s.x < w as f64 && s.y < h as f64) {
            return 1.0;
        }
        // Non-negative, so truncation is flooring
        let stored = self.shadow_map.get(s.x as usize, s.y as usize);
        if stored > s.z + self.bias { 0.0 } else { 1.0 }
    }
}

impl<M: Model> VertexShader for ShadowShader<'_, M> {
    fn shade_vertex(&mut self, face: usize, vert: usize) -> ClipVec {
        let m = self.model;
        let p = self.cam.modelview.apply_pt(m.vert(face, vert));
        self.eye[vert] = p;
        self.nrm[vert] = self.cam.normal.apply_dir(m.normal(face, vert));
        self.uv[vert] = m.uv(face, vert);
        self.cam.project.apply(p.to_pt())
    }
}

impl<M: MaybeSync> FragmentShader for ShadowShader<'_, M> {
    fn shade_fragment(&self, frag: Frag) -> Option<Color3> {
        let bar = frag.bar;
        let p = bary(self.eye, bar);
        let view = self.cam.view_dir(p);
        let n = bary(self.nrm, bar).try_normalize().unwrap_or(view);

        let l = &self.light;
        let direct = l.diffuse_term(n) + l.specular_term(n, view);
        let i = l.ambient + self.lit(p) * direct;
        let uv = bary(self.uv, bar);
        Some(shade(diffuse_color(self.diffuse, uv), i))
    }
}
