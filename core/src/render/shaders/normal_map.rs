//! Shading with an object-space normal map.

use crate::geom::Model;
use crate::math::{Color3, Vec3, bary};
use crate::render::shader::{FragmentShader, MaybeSync, VertexShader};
use crate::render::tex::{SamplerClamp, TexCoord, Texture, decode_normal};
use crate::render::{Camera, ClipVec, Frag};

use super::{Light, diffuse_color, shade, specular_intensity};

/// Shades each pixel with a normal read from a normal map.
///
/// Each texel of the map encodes an object-space unit normal in its color
/// channels, so surface detail finer than the mesh can be lit correctly.
/// The normal is transformed to eye space with the normal matrix of the
/// camera. The vertex normals of the model are ignored.
#[derive(Clone, Debug)]
pub struct NormalMapShader<'a, M> {
    model: &'a M,
    cam: Camera,
    light: Light,
    normal_map: &'a Texture,
    diffuse: Option<&'a Texture>,
    specular: Option<&'a Texture>,
    eye: [Vec3; 3],
    uv: [TexCoord; 3],
}

impl<'a, M: Model> NormalMapShader<'a, M> {
    /// Returns a normal-mapping shader rendering `model` as seen by `cam`,
    /// lit from the world-space direction `light_dir`.
    pub fn new(
        cam: &Camera,
        model: &'a M,
        normal_map: &'a Texture,
        light_dir: Vec3,
    ) -> Self {
        Self {
            model,
            cam: *cam,
            light: Light::new(cam, light_dir),
            normal_map,
            diffuse: None,
            specular: None,
            eye: [Vec3::ZERO; 3],
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

impl<M: Model> VertexShader for NormalMapShader<'_, M> {
    fn shade_vertex(&mut self, face: usize, vert: usize) -> ClipVec {
        let p = self.cam.modelview.apply_pt(self.model.vert(face, vert));
        self.eye[vert] = p;
        self.uv[vert] = self.model.uv(face, vert);
        self.cam.project.apply(p.to_pt())
    }
}

impl<M: MaybeSync> FragmentShader for NormalMapShader<'_, M> {
    fn shade_fragment(&self, frag: Frag) -> Option<Color3> {
        let bar = frag.bar;
        let uv = bary(self.uv, bar);
        let view = self.cam.view_dir(bary(self.eye, bar));

        let texel = SamplerClamp.sample(self.normal_map, uv);
        let n = self
            .cam
            .normal
            .apply_dir(decode_normal(texel))
            .try_normalize()
            .unwrap_or(view);

        let spec = specular_intensity(self.specular, uv);
        let i = self.light.intensity(n, view, spec);
        Some(shade(diffuse_color(self.diffuse, uv), i))
    }
}

#[cfg(test)]
mod tests {
    use crate::math::{rgb, vec3};
    use crate::util::buf::Buf2;

    use super::super::tests::{camera, draw, quad};
    use super::*;

    fn map(c: Color3) -> Texture {
        Texture::from(Buf2::new(1, 1, [c]))
    }

    #[test]
    fn normal_from_map_overrides_vertex_normals() {
        let q = quad();
        let cam = camera();

        // Encodes +x; the quad itself faces +z
        let right = map(rgb(0xFF, 0x80, 0x80));
        let white = map(Color3::WHITE);
        let mut sh = NormalMapShader::new(&cam, &q, &right, Vec3::X)
            .with_diffuse(&white);
        let lit = draw(&mut sh).color_buf[[16, 16]];

        let mut sh = NormalMapShader::new(&cam, &q, &right, -Vec3::X);
        let unlit = draw(&mut sh).color_buf[[16, 16]];

        // Ambient plus full diffuse
        assert_eq!(lit, Color3::WHITE);
        // Ambient only
        assert_eq!(unlit, rgb(25, 20, 17));
    }

    #[test]
    fn normal_is_transformed_to_eye_space() {
        let q = quad();
        // Looking from +x, so object-space +x faces the viewer
        let cam = Camera::new((32, 32))
            .look_at(vec3(3.0, 0.0, 0.0), Vec3::ZERO, Vec3::Y)
            .unwrap();
        let right = map(rgb(0xFF, 0x80, 0x80));
        let mut sh = NormalMapShader::new(&cam, &q, &right, Vec3::X);

        sh.shade_vertex(0, 0);
        sh.shade_vertex(0, 1);
        sh.shade_vertex(0, 2);
        let frag = Frag {
            pos: Vec3::ZERO,
            bar: vec3(1.0, 1.0, 1.0) / 3.0,
        };
        // Light is head-on, so diffuse is at maximum
        let c = sh.shade_fragment(frag).unwrap();
        assert_eq!(c, Color3::WHITE);
    }
}
