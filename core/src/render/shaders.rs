//! Shading algorithms.
//!
//! Every shader in this module implements [`Shader`][super::Shader] and
//! can be rendered with the same rasterization loop. The shaders are
//! constructed from a [`Camera`] and a [`Model`][crate::geom::Model], and
//! look up any per-pixel surface attributes from [`Texture`]s.
//!
//! All shaders use a single directional [`Light`], and some variation of
//! the Phong reflection model: the intensity of a surface point is the sum
//! of a constant ambient term, a diffuse term proportional to the cosine
//! of the angle between the surface normal and the light direction, and
//! a specular term depending on the angle between the reflected light
//! direction and the direction toward the viewer.
//!
//! The vertex stage of each shader records eye-space positions, normals
//! and texture coordinates of the current face, which the fragment stage
//! then interpolates using the perspective-correct barycentric weights.

use crate::math::{Color3, Color3f, Vec3, rgbf};

use super::cam::Camera;
use super::tex::{SamplerClamp, TexCoord, Texture};

pub use flat::FlatShader;
pub use normal_map::NormalMapShader;
pub use phong::PhongShader;
pub use shadow::{DepthShader, ShadowShader};
pub use tangent::TangentShader;

pub mod flat;
pub mod normal_map;
pub mod phong;
pub mod shadow;
pub mod tangent;

/// Surface color used when a shader has no diffuse texture.
pub const BASE_COLOR: Color3f = rgbf(1.0, 0.8, 0.7);

/// A directional light and the parameters of the reflection model.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Light {
    /// Unit vector pointing toward the light, in eye space.
    pub dir: Vec3,
    /// Intensity of the ambient term.
    pub ambient: f64,
    /// Scale of the specular term.
    pub specular: f64,
    /// Exponent of the specular term. Larger values yield smaller,
    /// sharper highlights.
    pub shininess: i32,
}

impl Light {
    /// Returns a light shining from the world-space direction `dir`
    /// as seen by `cam`.
    ///
    /// The light direction points *toward* the light, so a light at
    /// `(1, 1, 1)` lights surfaces facing that way.
    pub fn new(cam: &Camera, dir: Vec3) -> Self {
        Self {
            dir: cam.eye_dir(dir),
            ambient: 0.1,
            specular: 1.0,
            shininess: 32,
        }
    }

    /// Returns `self` with the ambient intensity set to `ambient`.
    #[must_use]
    pub fn with_ambient(self, ambient: f64) -> Self {
        Self { ambient, ..self }
    }

    /// Returns `self` with the specular scale and exponent set.
    #[must_use]
    pub fn with_specular(self, specular: f64, shininess: i32) -> Self {
        Self { specular, shininess, ..self }
    }

    /// Returns the diffuse intensity of a surface with unit normal `n`.
    #[inline]
    pub fn diffuse_term(&self, n: Vec3) -> f64 {
        n.dot(self.dir).max(0.0)
    }

    /// Returns the specular intensity of a surface with unit normal `n`
    /// seen from the unit direction `view`.
    ///
    /// Zero if the surface faces away from the light.
    #[inline]
    pub fn specular_term(&self, n: Vec3, view: Vec3) -> f64 {
        if n.dot(self.dir) <= 0.0 {
            return 0.0;
        }
        let r = self.dir.reflect(n).try_normalize().unwrap_or(n);
        self.specular * powi(r.dot(view).max(0.0), self.shininess)
    }

    /// Returns the total intensity of a surface with unit normal `n` seen
    /// from the unit direction `view`, with the specular term scaled by
    /// `spec`.
    #[inline]
    pub fn intensity(&self, n: Vec3, view: Vec3, spec: f64) -> f64 {
        self.ambient + self.diffuse_term(n) + spec * self.specular_term(n, view)
    }
}

/// Returns the diffuse color at `uv`, or [`BASE_COLOR`] if there is no
/// diffuse texture.
#[inline]
pub fn diffuse_color(tex: Option<&Texture>, uv: TexCoord) -> Color3f {
    tex.map_or(BASE_COLOR, |t| SamplerClamp.sample(t, uv).to_color3f())
}

/// Returns the specular intensity in `[0, 1]` at `uv`, read from the red
/// channel of `tex`, or 1 if there is no specular map.
#[inline]
pub fn specular_intensity(tex: Option<&Texture>, uv: TexCoord) -> f64 {
    tex.map_or(1.0, |t| SamplerClamp.sample(t, uv).r() as f64 / 255.0)
}

/// Returns `c` scaled by `intensity`, clamped to the displayable range.
#[inline]
pub fn shade(c: Color3f, intensity: f64) -> Color3 {
    (c * intensity).to_color3()
}

fn powi(x: f64, n: i32) -> f64 {
    use crate::math::float::f64;
    f64::powi(x, n)
}
