//! Translation of triangles into discrete pixels in the framebuffer.
//!
//! Each triangle is first mapped from clip space to screen space by
//! dividing by `w` and applying the viewport transform. Triangles whose
//! doubled signed screen-space area is below a threshold are culled; this
//! single test rejects both back-facing and degenerate triangles.
//!
//! The rasterizer then scans the pixels of the triangle's bounding box.
//! For each pixel, it computes the barycentric weights of the pixel center
//! with respect to the three screen-space vertices. Pixels with a negative
//! weight lie outside the triangle and are skipped. The depth of a pixel
//! is interpolated linearly in screen space, which is correct because
//! depth is affine in screen space after the projective divide.
//!
//! If depth testing is enabled, covered pixels are then tested against the
//! current depth value in their position. For each pixel that passes the
//! test, the barycentric weights are corrected for perspective and passed
//! to the fragment shader, and the color it returns is written into the
//! framebuffer. Fragments that fail the test or are discarded by the
//! shader are not written.

use core::ops::Range;

#[cfg(feature = "parallel")]
use alloc::vec::Vec;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::geom::Tri;
use crate::math::{Color3, Mat3, Mat4, Vec2, Vec3, vec2, vec3};
use crate::util::Dims;

use super::ctx::{Context, FillRule, depth_test};
use super::shader::FragmentShader;
use super::stats::Throughput;
use super::target::{Framebuf, Target};
use super::ClipVec;

/// Point in screen space.
/// `x` and `y` are viewport pixel coordinates, `z` is depth.
pub type ScreenPt = Vec3;

/// A fragment, or a single "pixel" in a rasterized triangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frag {
    /// The center of the pixel, with the interpolated depth as `z`.
    pub pos: ScreenPt,
    /// The perspective-correct barycentric weights of the fragment.
    ///
    /// Non-negative and summing to one for every rasterized fragment.
    pub bar: Vec3,
}

/// Per-triangle state of the rasterizer.
#[derive(Copy, Clone, Debug)]
pub struct Setup {
    /// The screen-space xy coordinates of the vertices.
    screen: [Vec2; 3],
    /// The NDC depths of the vertices.
    depths: Vec3,
    /// The clip-space w of the vertices.
    ws: Vec3,
    /// Cofactors of the area matrix. Row `i` holds the coefficients of
    /// the edge function of the edge opposite vertex `i`.
    edges: Mat3,
    /// Twice the signed area of the triangle.
    det: f64,
    /// Whether each edge is a top or a left edge.
    owned: [bool; 3],
}

/// Result of processing a single pixel.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Sample {
    /// Not covered by the triangle.
    Outside,
    /// Covered, but failed the depth test or was discarded.
    Covered,
    /// Covered and shaded, with the given depth and color.
    Shaded(f64, Color3),
}

impl Setup {
    /// Sets up the rasterization of a triangle with clip-space vertices
    /// `clip`, using `viewport` to map NDC coordinates to the screen.
    ///
    /// Returns `None` if the triangle should not be drawn: if a vertex
    /// has a zero `w` or any non-finite coordinate, or if twice the signed
    /// screen-space area is less than `min_area`.
    pub fn new(
        clip: &Tri<ClipVec>,
        viewport: &Mat4,
        min_area: f64,
    ) -> Option<Self> {
        let verts = clip.0;
        if verts.iter().any(|v| v.w == 0.0 || !v.is_finite()) {
            return None;
        }
        let ndc = verts.map(|v| v.xyz() / v.w);
        let screen = ndc.map(|p| viewport.apply(p.to_pt()).xy());

        let area = Mat3::from_rows(screen.map(|s| s.to_vec3(1.0)));
        let det = area.determinant();
        // Also rejects NaN
        if !(det >= min_area) {
            return None;
        }
        let edges = area.cofactor();
        let owned = [0, 1, 2].map(|i| {
            let e = edges.row(i);
            e.x > 0.0 || (e.x == 0.0 && e.y < 0.0)
        });
        Some(Self {
            screen,
            depths: vec3(ndc[0].z, ndc[1].z, ndc[2].z),
            ws: vec3(verts[0].w, verts[1].w, verts[2].w),
            edges,
            det,
            owned,
        })
    }

    /// Returns twice the signed screen-space area of the triangle.
    pub fn doubled_area(&self) -> f64 {
        self.det
    }

    /// Returns the screen-space vertex positions of the triangle.
    pub fn screen_verts(&self) -> [Vec2; 3] {
        self.screen
    }

    /// Returns the ranges of pixel columns and rows that may be covered by
    /// the triangle, clamped to a render target of dimensions `dims`.
    pub fn bbox(&self, (w, h): Dims) -> (Range<usize>, Range<usize>) {
        let [a, b, c] = self.screen;
        let lo = vec2(a.x.min(b.x).min(c.x), a.y.min(b.y).min(c.y));
        let hi = vec2(a.x.max(b.x).max(c.x), a.y.max(b.y).max(c.y));

        let (w, h) = (w as f64, h as f64);
        let x0 = floor(lo.x).clamp(0.0, w) as usize;
        let y0 = floor(lo.y).clamp(0.0, h) as usize;
        let x1 = (floor(hi.x) + 1.0).clamp(0.0, w) as usize;
        let y1 = (floor(hi.y) + 1.0).clamp(0.0, h) as usize;
        (x0..x1, y0..y1)
    }

    /// Returns the values of the three edge functions at `p`.
    ///
    /// Each value is twice the signed area of the sub-triangle formed by
    /// `p` and one edge, and is positive on the inner side of the edge.
    #[inline]
    pub fn edge_values(&self, p: Vec2) -> Vec3 {
        self.edges.apply(p.to_vec3(1.0))
    }

    /// Returns the screen-space barycentric weights of the point `p`.
    ///
    /// Equal to the inverse transpose of the area matrix applied to
    /// `(p.x, p.y, 1)`.
    #[inline]
    pub fn screen_bary(&self, p: Vec2) -> Vec3 {
        self.edge_values(p) / self.det
    }

    /// Returns whether the point with screen-space barycentric weights (or
    /// edge values) `bc` is covered by the triangle under `rule`.
    #[inline]
    pub fn covers(&self, bc: Vec3, rule: FillRule) -> bool {
        let covers_edge = |i: usize| match rule {
            FillRule::Inclusive => bc[i] >= 0.0,
            FillRule::TopLeft => {
                bc[i] > 0.0 || (bc[i] == 0.0 && self.owned[i])
            }
        };
        covers_edge(0) && covers_edge(1) && covers_edge(2)
    }

    /// Returns the depth of the point with screen-space weights `bc`.
    #[inline]
    pub fn depth(&self, bc: Vec3) -> f64 {
        bc.dot(self.depths)
    }

    /// Returns the perspective-correct weights matching the screen-space
    /// weights `bc`.
    ///
    /// Each weight is divided by the clip-space `w` of its vertex and the
    /// result renormalized to sum to one.
    #[inline]
    pub fn clip_bary(&self, bc: Vec3) -> Vec3 {
        let bc_clip = bc.zip_map(self.ws, |b, w| b / w);
        let sum = bc_clip.x + bc_clip.y + bc_clip.z;
        if sum == 0.0 { bc } else { bc_clip / sum }
    }
}

/// Rasterizes the triangle with clip-space vertices `clip` into `fb`,
/// shading each visible pixel with `fs`.
///
/// Returns the number of pixels covered and written, or `None` if the
/// triangle was skipped or culled.
pub fn tri<Fs, Col>(
    clip: &Tri<ClipVec>,
    fs: &Fs,
    viewport: &Mat4,
    fb: &mut Framebuf<Col>,
    ctx: &Context,
) -> Option<Throughput>
where
    Fs: FragmentShader + ?Sized,
    Col: Target,
{
    let setup = Setup::new(clip, viewport, ctx.min_area)?;
    let (xs, ys) = setup.bbox(fb.dims());

    // `Context` is not `Sync`, so copy what the scan needs
    let (fill_rule, test_depth) = (ctx.fill_rule, ctx.depth_test);
    let shade = |x: usize, y: usize, curr: f64| {
        let p = vec2(x as f64 + 0.5, y as f64 + 0.5);
        let bc = setup.screen_bary(p);
        if !setup.covers(bc, fill_rule) {
            return Sample::Outside;
        }
        let z = setup.depth(bc);
        if !depth_test(test_depth, z, curr) {
            return Sample::Covered;
        }
        let frag = Frag {
            pos: vec3(p.x, p.y, z),
            bar: setup.clip_bary(bc),
        };
        match fs.shade_fragment(frag) {
            Some(c) => Sample::Shaded(z, c),
            None => Sample::Covered,
        }
    };

    let mut frags = Throughput::default();

    #[cfg(feature = "parallel")]
    {
        // Distinct pixels never alias, so the rows can be shaded in
        // parallel and written back afterwards.
        let depth_buf = &fb.depth_buf;
        let samples: Vec<_> = ys
            .into_par_iter()
            .flat_map_iter(|y| {
                let shade = &shade;
                xs.clone().filter_map(move |x| {
                    match shade(x, y, depth_buf.get(x, y)) {
                        Sample::Outside => None,
                        s => Some((x, y, s)),
                    }
                })
            })
            .collect();

        for (x, y, s) in samples {
            write(fb, ctx, &mut frags, x, y, s);
        }
    }
    #[cfg(not(feature = "parallel"))]
    for y in ys {
        for x in xs.clone() {
            let s = shade(x, y, fb.depth_buf.get(x, y));
            write(fb, ctx, &mut frags, x, y, s);
        }
    }

    Some(frags)
}

fn write<Col: Target>(
    fb: &mut Framebuf<Col>,
    ctx: &Context,
    frags: &mut Throughput,
    x: usize,
    y: usize,
    s: Sample,
) {
    match s {
        Sample::Outside => {}
        Sample::Covered => frags.i += 1,
        Sample::Shaded(z, c) => {
            if ctx.depth_write {
                fb.depth_buf.set(x, y, z);
            }
            if ctx.color_write {
                fb.color_buf.set(x, y, c);
            }
            frags.i += 1;
            frags.o += 1;
        }
    }
}

fn floor(x: f64) -> f64 {
    use crate::math::float::f64;
    f64::floor(x)
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::math::vec4;
    use crate::util::buf::Buf2;

    use super::*;

    fn clip_tri(pts: [(f64, f64); 3]) -> Tri<ClipVec> {
        Tri(pts.map(|(x, y)| vec4(x, y, 0.0, 1.0)))
    }

    fn setup(pts: [(f64, f64); 3]) -> Option<Setup> {
        Setup::new(&clip_tri(pts), &Mat4::identity(), 1.0)
    }

    fn white(_: Frag) -> Color3 {
        Color3::WHITE
    }

    fn count(buf: &Buf2<Color3>, c: Color3) -> usize {
        buf.iter().filter(|&&p| p == c).count()
    }

    const TRI: [(f64, f64); 3] = [(10.0, 10.0), (100.0, 10.0), (10.0, 100.0)];

    #[test]
    fn setup_culls_back_facing() {
        let cw = [(10.0, 10.0), (10.0, 100.0), (100.0, 10.0)];
        assert!(setup(cw).is_none());
        assert!(setup(TRI).is_some());
    }

    #[test]
    fn setup_culls_degenerate_and_tiny() {
        let collinear = [(0.0, 0.0), (5.0, 5.0), (10.0, 10.0)];
        assert!(setup(collinear).is_none());

        // Doubled area 0.5
        let tiny = [(0.0, 0.0), (1.0, 0.0), (0.0, 0.5)];
        assert!(setup(tiny).is_none());

        // Doubled area exactly 1
        let unit = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
        assert_eq!(setup(unit).map(|s| s.doubled_area()), Some(1.0));
    }

    #[test]
    fn setup_skips_point_at_infinity() {
        let mut t = clip_tri(TRI);
        t.0[1].w = 0.0;
        assert!(Setup::new(&t, &Mat4::identity(), 1.0).is_none());

        t.0[1].w = f64::NAN;
        assert!(Setup::new(&t, &Mat4::identity(), 1.0).is_none());
    }

    #[test]
    fn screen_verts_are_divided_and_mapped() {
        let clip = Tri([
            vec4(-2.0, -2.0, 0.0, 2.0),
            vec4(1.0, -1.0, 0.0, 1.0),
            vec4(0.0, 4.0, 0.0, 4.0),
        ]);
        let vp = crate::render::cam::viewport(0.0, 0.0, 100.0, 100.0);
        let s = Setup::new(&clip, &vp, 1.0).unwrap();
        assert_approx_eq!(
            s.screen_verts(),
            [vec2(0.0, 0.0), vec2(100.0, 0.0), vec2(50.0, 100.0)]
        );
        assert_approx_eq!(s.doubled_area(), 100.0 * 100.0);
    }

    #[test]
    fn bbox_is_clamped() {
        let s = setup(TRI).unwrap();
        assert_eq!(s.bbox((200, 200)), (10..101, 10..101));
        assert_eq!(s.bbox((50, 40)), (10..50, 10..40));

        let s = setup([(-5.5, -3.0), (20.0, -3.0), (-5.5, 7.2)]).unwrap();
        assert_eq!(s.bbox((200, 200)), (0..21, 0..8));
    }

    #[test]
    fn screen_bary_at_vertices_and_centroid() {
        let s = setup(TRI).unwrap();
        assert_eq!(s.screen_bary(vec2(10.0, 10.0)), vec3(1.0, 0.0, 0.0));
        assert_eq!(s.screen_bary(vec2(100.0, 10.0)), vec3(0.0, 1.0, 0.0));
        assert_eq!(s.screen_bary(vec2(10.0, 100.0)), vec3(0.0, 0.0, 1.0));
        assert_approx_eq!(
            s.screen_bary(vec2(40.0, 40.0)),
            vec3(1.0, 1.0, 1.0) / 3.0
        );
    }

    #[test]
    fn covers_edges_by_rule() {
        let s = setup(TRI).unwrap();
        // On the bottom edge, which is neither top nor left
        let bc = s.screen_bary(vec2(50.0, 10.0));
        assert!(s.covers(bc, FillRule::Inclusive));
        assert!(!s.covers(bc, FillRule::TopLeft));
        // On the left edge
        let bc = s.screen_bary(vec2(10.0, 50.0));
        assert!(s.covers(bc, FillRule::Inclusive));
        assert!(s.covers(bc, FillRule::TopLeft));
        // Outside
        let bc = s.screen_bary(vec2(9.0, 50.0));
        assert!(!s.covers(bc, FillRule::Inclusive));
        assert!(!s.covers(bc, FillRule::TopLeft));
    }

    #[test]
    fn depth_is_affine_in_screen_space() {
        let t = Tri([
            vec4(0.0, 0.0, -1.0, 1.0),
            vec4(8.0, 0.0, 1.0, 1.0),
            vec4(0.0, 8.0, 0.5, 1.0),
        ]);
        let s = Setup::new(&t, &Mat4::identity(), 1.0).unwrap();
        assert_eq!(s.depth(vec3(1.0, 0.0, 0.0)), -1.0);
        assert_eq!(s.depth(vec3(0.5, 0.5, 0.0)), 0.0);
        assert_eq!(s.depth(vec3(0.0, 0.5, 0.5)), 0.75);
    }

    #[test]
    fn clip_bary_divides_by_w() {
        let t = Tri([
            vec4(0.0, 0.0, 0.0, 1.0),
            vec4(16.0, 0.0, 0.0, 2.0),
            vec4(0.0, 32.0, 0.0, 4.0),
        ]);
        let s = Setup::new(&t, &Mat4::identity(), 1.0).unwrap();
        let bc = s.clip_bary(vec3(1.0, 1.0, 1.0) / 3.0);
        assert_approx_eq!(bc, vec3(4.0, 2.0, 1.0) / 7.0);
        // Weights at the vertices are unaffected
        assert_eq!(s.clip_bary(vec3(0.0, 1.0, 0.0)), vec3(0.0, 1.0, 0.0));
    }

    #[test]
    fn tri_fills_interior_only() {
        let mut fb = Framebuf::new((128, 128));
        let ctx = Context::default();

        let res = tri(&clip_tri(TRI), &white, &Mat4::identity(), &mut fb, &ctx);

        // Pixel centers (x + ½, y + ½) with x, y >= 10 and x + y <= 109
        assert_eq!(res, Some(Throughput { i: 4095, o: 4095 }));
        assert_eq!(count(&fb.color_buf, Color3::WHITE), 4095);
        for y in 0..128 {
            for x in 0..128 {
                let inside = x >= 10 && y >= 10 && x + y <= 109;
                let c = fb.color_buf[[x, y]];
                assert_eq!(c == Color3::WHITE, inside, "at {x}, {y}");
                let z = fb.depth_buf.get(x, y);
                assert_eq!(z == 0.0, inside, "at {x}, {y}");
            }
        }
    }

    #[test]
    fn tri_culled_writes_nothing() {
        let mut fb = Framebuf::new((16, 16));
        let ctx = Context::default();
        let collinear = clip_tri([(1.0, 1.0), (5.0, 5.0), (9.0, 9.0)]);

        let res = tri(&collinear, &white, &Mat4::identity(), &mut fb, &ctx);

        assert_eq!(res, None);
        assert_eq!(count(&fb.color_buf, Color3::WHITE), 0);
    }

    #[test]
    fn tri_top_left_draws_shared_edge_once() {
        let a = clip_tri([(0.0, 0.0), (8.0, 0.0), (8.0, 8.0)]);
        let b = clip_tri([(0.0, 0.0), (8.0, 8.0), (0.0, 8.0)]);

        for (rule, total) in [(FillRule::TopLeft, 64), (FillRule::Inclusive, 72)]
        {
            let ctx = Context {
                fill_rule: rule,
                depth_test: false,
                ..Context::default()
            };
            let mut fb_a = Framebuf::new((8, 8));
            let mut fb_b = Framebuf::new((8, 8));
            let id = Mat4::identity();
            let na = tri(&a, &white, &id, &mut fb_a, &ctx).unwrap();
            let nb = tri(&b, &white, &id, &mut fb_b, &ctx).unwrap();
            assert_eq!(na.o + nb.o, total, "{rule:?}");

            if rule == FillRule::TopLeft {
                for (pa, pb) in fb_a.color_buf.iter().zip(fb_b.color_buf.iter())
                {
                    let n = (*pa == Color3::WHITE) as u32
                        + (*pb == Color3::WHITE) as u32;
                    assert_eq!(n, 1);
                }
            }
        }
    }

    #[test]
    fn tri_discard_writes_nothing() {
        let mut fb = Framebuf::new((128, 128));
        let ctx = Context::default();
        let discard = |_: Frag| None::<Color3>;

        let res = tri(&clip_tri(TRI), &discard, &Mat4::identity(), &mut fb, &ctx);

        assert_eq!(res, Some(Throughput { i: 4095, o: 0 }));
        assert_eq!(count(&fb.color_buf, Color3::BLACK), 128 * 128);
        assert!(fb.depth_buf.buf().iter().all(|&z| z == f64::NEG_INFINITY));
    }

    #[test]
    fn tri_respects_write_masks() {
        let mut fb = Framebuf::new((128, 128));
        let ctx = Context {
            color_write: false,
            ..Context::default()
        };
        tri(&clip_tri(TRI), &white, &Mat4::identity(), &mut fb, &ctx);
        assert_eq!(count(&fb.color_buf, Color3::WHITE), 0);
        assert_eq!(fb.depth_buf.get(20, 20), 0.0);

        let mut fb = Framebuf::new((128, 128));
        let ctx = Context {
            depth_write: false,
            ..Context::default()
        };
        tri(&clip_tri(TRI), &white, &Mat4::identity(), &mut fb, &ctx);
        assert_eq!(count(&fb.color_buf, Color3::WHITE), 4095);
        assert_eq!(fb.depth_buf.get(20, 20), f64::NEG_INFINITY);
    }

    #[test]
    fn tri_frags_have_valid_weights() {
        let t = Tri([
            vec4(0.0, 0.0, 0.0, 1.0),
            vec4(32.0, 0.0, 0.0, 2.0),
            vec4(0.0, 64.0, 0.0, 4.0),
        ]);
        let mut fb = Framebuf::new((16, 16));
        let ctx = Context::default();
        let check = |f: Frag| {
            let b = f.bar;
            let ok = b.x >= 0.0 && b.y >= 0.0 && b.z >= 0.0;
            let sum = b.x + b.y + b.z;
            let ok = ok && 1.0 - 1e-9 < sum && sum < 1.0 + 1e-9;
            ok.then_some(Color3::WHITE)
        };
        let res = tri(&t, &check, &Mat4::identity(), &mut fb, &ctx).unwrap();
        assert!(res.i > 0);
        assert_eq!(res.i, res.o);
    }
}
