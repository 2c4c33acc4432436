//! Cameras and camera transforms.
//!
//! A [`Camera`] holds the three independent transforms of the rendering
//! pipeline: the model-view matrix, which maps world (or model) space to
//! eye space; the projection matrix, which maps eye space to clip space;
//! and the viewport matrix, which maps normalized device coordinates to
//! pixel coordinates. The rasterizer combines them; they are never fused
//! into a single matrix.

use core::fmt::{self, Display, Formatter};

use crate::math::{Mat4, Vec3, translate, vec3, vec4};
use crate::util::Dims;

use super::{Context, Framebuf, Shader, Stats, Target};

/// Error in camera configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The up vector is parallel to the viewing direction.
    DegenerateUp,
    /// The eye and the center of view are the same point.
    EyeAtCenter,
    /// The focal distance of a perspective projection is zero or not finite.
    ZeroFocalDistance,
    /// The model-view matrix is singular and has no normal matrix.
    SingularModelView,
}

/// Result of configuring a camera.
pub type Result<T> = core::result::Result<T, Error>;

/// An immutable set of camera transforms, built once per frame and passed
/// by reference to shaders and the rasterizer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    /// Dimensions of the render target in pixels.
    pub dims: Dims,
    /// World-to-eye transform.
    pub modelview: Mat4,
    /// Transform for normal vectors, the inverse transpose of `modelview`.
    pub normal: Mat4,
    /// Eye-to-clip transform.
    pub project: Mat4,
    /// NDC-to-screen transform.
    pub viewport: Mat4,
}

/// Returns a world-to-eye matrix for a viewer at `eye` looking at `center`,
/// with `up` pointing approximately up in the image.
///
/// The result maps `center` to the origin and `eye` to the positive z-axis,
/// at distance `|eye - center|` from the origin.
///
/// # Errors
/// * [`Error::EyeAtCenter`] if `eye` equals `center`.
/// * [`Error::DegenerateUp`] if `up` is zero or parallel to `eye - center`.
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Result<Mat4> {
    let n = (eye - center).try_normalize().ok_or(Error::EyeAtCenter)?;
    let l = up.cross(n).try_normalize().ok_or(Error::DegenerateUp)?;
    let m = n.cross(l).normalize();
    let rotate = Mat4::from_rows([
        l.to_dir(),
        m.to_dir(),
        n.to_dir(),
        vec4(0.0, 0.0, 0.0, 1.0),
    ]);
    Ok(rotate * translate(-center))
}

/// Returns a simple perspective projection matrix with focal distance `f`.
///
/// The result maps an eye-space point `(x, y, z, 1)` to a clip-space point
/// `(x, y, z, 1 - z/f)`. Points nearer to the eye thus have a smaller `w`
/// and appear larger after the perspective divide.
///
/// # Errors
/// [`Error::ZeroFocalDistance`] if `f` is zero or not finite.
pub fn perspective(f: f64) -> Result<Mat4> {
    if f == 0.0 || !f.is_finite() {
        return Err(Error::ZeroFocalDistance);
    }
    Ok(Mat4::from_rows([
        vec4(1.0, 0.0, 0.0, 0.0),
        vec4(0.0, 1.0, 0.0, 0.0),
        vec4(0.0, 0.0, 1.0, 0.0),
        vec4(0.0, 0.0, -1.0 / f, 1.0),
    ]))
}

/// Returns a matrix that maps the normalized device coordinates `[-1, 1]²`
/// to the pixel rectangle `[x, x + w] × [y, y + h]`.
///
/// The z coordinate is unchanged.
pub fn viewport(x: f64, y: f64, w: f64, h: f64) -> Mat4 {
    Mat4::from_rows([
        vec4(w / 2.0, 0.0, 0.0, x + w / 2.0),
        vec4(0.0, h / 2.0, 0.0, y + h / 2.0),
        vec4(0.0, 0.0, 1.0, 0.0),
        vec4(0.0, 0.0, 0.0, 1.0),
    ])
}

impl Camera {
    /// Creates a camera for a render target with the given dimensions.
    ///
    /// The model-view and projection matrices are initially identities and
    /// the viewport covers the whole target.
    pub fn new(dims: Dims) -> Self {
        let (w, h) = dims;
        Self {
            dims,
            modelview: Mat4::identity(),
            normal: Mat4::identity(),
            project: Mat4::identity(),
            viewport: viewport(0.0, 0.0, w as f64, h as f64),
        }
    }

    /// Sets the model-view transform to look from `eye` toward `center`.
    ///
    /// # Errors
    /// See [`look_at`].
    pub fn look_at(self, eye: Vec3, center: Vec3, up: Vec3) -> Result<Self> {
        Self {
            modelview: look_at(eye, center, up)?,
            ..self
        }
        .with_normal()
    }

    /// Composes the model transform `m` into the model-view transform, so
    /// that `m` is applied first.
    ///
    /// # Errors
    /// [`Error::SingularModelView`] if the result is not invertible.
    pub fn model(self, m: &Mat4) -> Result<Self> {
        Self {
            modelview: self.modelview * *m,
            ..self
        }
        .with_normal()
    }

    /// Sets the projection to a perspective projection with focal
    /// distance `f`.
    ///
    /// # Errors
    /// See [`perspective`].
    pub fn perspective(self, f: f64) -> Result<Self> {
        Ok(Self { project: perspective(f)?, ..self })
    }

    /// Sets the viewport to the pixel rectangle with lower-left corner
    /// `(x, y)` and size `(w, h)`.
    ///
    /// Screen y grows upward; flip the image vertically before display.
    pub fn viewport(self, x: usize, y: usize, w: usize, h: usize) -> Self {
        Self {
            viewport: viewport(x as f64, y as f64, w as f64, h as f64),
            ..self
        }
    }

    /// Returns the composed model-view and projection matrix.
    pub fn world_to_clip(&self) -> Mat4 {
        self.project * self.modelview
    }

    /// Returns the eye-space direction of the world-space direction `d`,
    /// normalized, or the zero vector if `d` is zero.
    pub fn eye_dir(&self, d: Vec3) -> Vec3 {
        self.modelview
            .apply_dir(d)
            .try_normalize()
            .unwrap_or_default()
    }

    /// Returns the unit direction from the eye-space point `p` toward
    /// the viewer.
    ///
    /// With a perspective projection of focal distance `f`, the viewer is
    /// at `(0, 0, f)` in eye space. Otherwise the direction is `+z`.
    pub fn view_dir(&self, p: Vec3) -> Vec3 {
        let k = self.project.0[3][2];
        let to_eye = if k == 0.0 {
            Vec3::Z
        } else {
            vec3(0.0, 0.0, -1.0 / k) - p
        };
        to_eye.try_normalize().unwrap_or(Vec3::Z)
    }

    /// Returns the screen-space position of the world-space point `p`,
    /// with NDC depth as `z`, or `None` if `p` projects to infinity.
    pub fn project_to_screen(&self, p: Vec3) -> Option<Vec3> {
        let ndc = self.world_to_clip().apply(p.to_pt()).project()?;
        Some(self.viewport.apply(ndc.to_pt()).xyz())
    }

    /// Renders `nfaces` faces with `shader` into `fb` from the viewpoint
    /// of this camera.
    ///
    /// The shader is expected to have been built from this camera.
    pub fn render<Sh, Col>(
        &self,
        nfaces: usize,
        shader: &mut Sh,
        fb: &mut Framebuf<Col>,
        ctx: &Context,
    ) -> Stats
    where
        Sh: Shader,
        Col: Target,
    {
        super::render(nfaces, shader, self, fb, ctx)
    }

    fn with_normal(self) -> Result<Self> {
        let normal = self
            .modelview
            .checked_invert_transpose()
            .ok_or(Error::SingularModelView)?;
        Ok(Self { normal, ..self })
    }
}

impl core::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("invalid camera: ")?;
        f.write_str(match self {
            Error::DegenerateUp => "up vector parallel to view direction",
            Error::EyeAtCenter => "eye and center are the same point",
            Error::ZeroFocalDistance => "focal distance zero or not finite",
            Error::SingularModelView => "model-view matrix is singular",
        })
    }
}
