use softrast_core::{assert_approx_eq, prelude::*};

use softrast_core::render::{
    ClipVec, DepthBuf, FillRule, Throughput,
    raster::Setup,
    render_to_buf, shader,
    shaders::{DepthShader, ShadowShader},
};

fn count(buf: &Buf2<Color3>, c: Color3) -> usize {
    buf.iter().filter(|&&p| p == c).count()
}

/// Renders the NDC triangles `tris` with a shader returning `color`.
fn render_ndc(
    tris: &[[ClipVec; 3]],
    cam: &Camera,
    fb: &mut Framebuf,
    ctx: &Context,
    color: Color3,
) -> Stats {
    let mut sh = shader::new(
        |face: usize, vert: usize| tris[face][vert],
        |_: Frag| color,
    );
    render(tris.len(), &mut sh, cam, fb, ctx)
}

#[test]
fn concrete_triangle_scenario() {
    // Maps NDC [-1, 1]² to screen [10, 100]²
    let cam = Camera::new((128, 128)).viewport(10, 10, 90, 90);
    let tri = [
        vec4(-1.0, -1.0, 0.0, 1.0),
        vec4(1.0, -1.0, 0.0, 1.0),
        vec4(-1.0, 1.0, 0.0, 1.0),
    ];
    let ctx = Context::default();
    let mut fb = Framebuf::new(cam.dims);
    fb.clear(&ctx);

    let stats = render_ndc(&[tri], &cam, &mut fb, &ctx, Color3::WHITE);

    // Half of 90², give or take the pixels on the hypotenuse
    let n = count(&fb.color_buf, Color3::WHITE);
    assert_eq!(n, 4095);
    assert_eq!(stats.frags, Throughput { i: n, o: n });

    for y in 0..128 {
        for x in 0..128 {
            if fb.color_buf[[x, y]] == Color3::WHITE {
                assert!((10..100).contains(&x), "x={x}");
                assert!((10..100).contains(&y), "y={y}");
                // Nothing outside the triangle
                assert!(x + y <= 109, "({x}, {y})");
            }
        }
    }
}

#[test]
fn rendering_twice_changes_nothing() {
    let cam = Camera::new((32, 32));
    let tri = [
        vec4(-0.9, -0.9, 0.2, 1.0),
        vec4(0.8, -0.5, 0.4, 1.0),
        vec4(0.1, 0.9, -0.3, 1.0),
    ];
    let ctx = Context::default();
    let mut fb = Framebuf::new(cam.dims);
    fb.clear(&ctx);

    let first = render_ndc(&[tri], &cam, &mut fb, &ctx, Color3::WHITE);
    let (color, depth) = (fb.color_buf.clone(), fb.depth_buf.clone());
    let second = render_ndc(&[tri], &cam, &mut fb, &ctx, rgb(0xFF, 0, 0));

    assert!(first.frags.o > 0);
    // Equal depths never pass the strict test
    assert_eq!(second.frags.o, 0);
    assert_eq!(second.frags.i, first.frags.i);
    assert_eq!(fb.color_buf, color);
    assert_eq!(fb.depth_buf, depth);
}

#[test]
fn occlusion_is_order_independent() {
    let cam = Camera::new((64, 64));
    let near = [
        vec4(-0.8, -0.8, 0.5, 1.0),
        vec4(0.8, -0.8, 0.5, 1.0),
        vec4(0.0, 0.8, 0.5, 1.0),
    ];
    let far = [
        vec4(-0.8, 0.6, -0.5, 1.0),
        vec4(0.0, -0.9, -0.5, 1.0),
        vec4(0.8, 0.6, -0.5, 1.0),
    ];
    let ctx = Context::default();

    let draw = |tris: &[[ClipVec; 3]]| {
        let mut sh = shader::new(
            |face: usize, vert: usize| tris[face][vert],
            |f: Frag| {
                if f.pos.z > 0.0 { rgb(0xFF, 0, 0) } else { rgb(0, 0, 0xFF) }
            },
        );
        render_to_buf(tris.len(), &mut sh, &cam, &ctx).color_buf
    };
    let a = draw(&[near, far]);
    let b = draw(&[far, near]);

    assert_eq!(a, b);
    // Both visible where they do not overlap
    assert_eq!(a[[32, 32]], rgb(0xFF, 0, 0));
    assert!(count(&a, rgb(0, 0, 0xFF)) > 0);
}

#[test]
fn back_facing_and_degenerate_are_culled() {
    let cam = Camera::new((32, 32));
    let clockwise = [
        vec4(-0.8, -0.8, 0.0, 1.0),
        vec4(0.0, 0.8, 0.0, 1.0),
        vec4(0.8, -0.8, 0.0, 1.0),
    ];
    let collinear = [
        vec4(-0.8, -0.8, 0.0, 1.0),
        vec4(0.0, 0.0, 0.0, 1.0),
        vec4(0.8, 0.8, 0.0, 1.0),
    ];
    // Less than half a square pixel
    let tiny = [
        vec4(0.0, 0.0, 0.0, 1.0),
        vec4(0.02, 0.0, 0.0, 1.0),
        vec4(0.0, 0.02, 0.0, 1.0),
    ];
    let ctx = Context::default();
    let mut fb = Framebuf::new(cam.dims);
    fb.clear(&ctx);

    let tris = [clockwise, collinear, tiny];
    let stats = render_ndc(&tris, &cam, &mut fb, &ctx, Color3::WHITE);

    assert_eq!(stats.prims, Throughput { i: 3, o: 0 });
    assert_eq!(stats.frags, Throughput::default());
    assert_eq!(count(&fb.color_buf, Color3::WHITE), 0);
}

#[test]
fn vertex_at_infinity_is_skipped() {
    let cam = Camera::new((32, 32));
    let tri = [
        vec4(-0.8, -0.8, 0.0, 1.0),
        vec4(0.8, -0.8, 0.0, 0.0),
        vec4(0.0, 0.8, 0.0, 1.0),
    ];
    let ctx = Context::default();
    let mut fb = Framebuf::new(cam.dims);
    fb.clear(&ctx);

    let stats = render_ndc(&[tri], &cam, &mut fb, &ctx, Color3::WHITE);

    assert_eq!(stats.prims, Throughput { i: 1, o: 0 });
    assert_eq!(count(&fb.color_buf, Color3::BLACK), 32 * 32);
}

#[test]
fn discarded_fragments_are_not_written() {
    let cam = Camera::new((32, 32));
    let tri = [
        vec4(-0.8, -0.8, 0.0, 1.0),
        vec4(0.8, -0.8, 0.0, 1.0),
        vec4(0.0, 0.8, 0.0, 1.0),
    ];
    let ctx = Context::default();
    let mut sh = shader::new(
        |_: usize, vert: usize| tri[vert],
        // Keeps the left half only
        |f: Frag| (f.pos.x < 16.0).then_some(Color3::WHITE),
    );
    let fb = render_to_buf(1, &mut sh, &cam, &ctx);

    let stats = ctx.stats.borrow();
    assert!(stats.frags.o > 0);
    assert!(stats.frags.o < stats.frags.i);
    for y in 0..32 {
        for x in 16..32 {
            assert_eq!(fb.color_buf[[x, y]], Color3::BLACK);
            assert_eq!(fb.depth_buf.get(x, y), f64::NEG_INFINITY);
        }
    }
}

#[test]
fn top_left_rule_covers_shared_edge_once() {
    let cam = Camera::new((8, 8));
    // A square split along the diagonal through the pixel centers
    let lower = [
        vec4(-1.0, -1.0, 0.0, 1.0),
        vec4(1.0, -1.0, 0.0, 1.0),
        vec4(1.0, 1.0, 0.0, 1.0),
    ];
    let upper = [
        vec4(-1.0, -1.0, 0.0, 1.0),
        vec4(1.0, 1.0, 0.0, 1.0),
        vec4(-1.0, 1.0, 0.0, 1.0),
    ];
    let coverage = |fill_rule| {
        let ctx = Context { fill_rule, ..Context::default() };
        let mut total = Buf2::new_with(8, 8, |_, _| 0);
        for tri in [lower, upper] {
            let mut fb = Framebuf::new(cam.dims);
            fb.clear(&ctx);
            render_ndc(&[tri], &cam, &mut fb, &ctx, Color3::WHITE);
            for y in 0..8 {
                for x in 0..8 {
                    if fb.color_buf[[x, y]] == Color3::WHITE {
                        total[[x, y]] += 1;
                    }
                }
            }
        }
        total
    };

    let top_left = coverage(FillRule::TopLeft);
    assert!(top_left.iter().all(|&n| n == 1));

    let inclusive = coverage(FillRule::Inclusive);
    assert_eq!(inclusive.iter().sum::<i32>(), 72);
    for i in 0..8 {
        assert_eq!(inclusive[[i, i]], 2);
    }
}

#[test]
fn interpolation_is_perspective_correct() {
    let cam = Camera::new((64, 64))
        .look_at(vec3(0.0, 2.0, 4.0), Vec3::ZERO, Vec3::Y)
        .and_then(|c| c.perspective(4.0))
        .unwrap();
    // A ground quad seen at an oblique angle
    let pos = [
        vec3(-1.0, 0.0, 1.0),
        vec3(1.0, 0.0, 1.0),
        vec3(1.0, 0.0, -1.0),
        vec3(-1.0, 0.0, -1.0),
    ];
    let tex = [
        vec2(0.0, 0.0),
        vec2(1.0, 0.0),
        vec2(1.0, 1.0),
        vec2(0.0, 1.0),
    ];
    let faces = [[0, 1, 2], [0, 2, 3]];
    let setups = faces.map(|f| {
        let clip = Tri(f.map(|i| cam.world_to_clip().apply(pos[i].to_pt())));
        Setup::new(&clip, &cam.viewport, 1.0).unwrap()
    });
    let uv_at = |face: usize, p: Vec3, correct: bool| {
        let setup = &setups[face];
        let bc = setup.screen_bary(cam.project_to_screen(p).unwrap().xy());
        let w = if correct { setup.clip_bary(bc) } else { bc };
        bary(faces[face].map(|i| tex[i]), w)
    };

    // Inside the first face
    let w = vec3(0.2, 0.3, 0.5);
    let p = bary(faces[0].map(|i| pos[i]), w);
    let expected = bary(faces[0].map(|i| tex[i]), w);
    assert_approx_eq!(uv_at(0, p, true), expected, eps = 1e-6);
    let naive = uv_at(0, p, false) - expected;
    assert!(naive.dot(naive) > 1e-4, "{naive:?}");

    // On the shared edge, both faces agree with each other and the truth
    let p = pos[0] * 0.7 + pos[2] * 0.3;
    let expected = tex[0] * 0.7 + tex[2] * 0.3;
    assert_approx_eq!(uv_at(0, p, true), expected, eps = 1e-6);
    assert_approx_eq!(uv_at(1, p, true), expected, eps = 1e-6);
}

fn ground_and_occluder() -> Mesh {
    let mut b = Mesh::builder();
    for (y, s) in [(0.0, 1.0), (1.0, 0.3)] {
        // Counter-clockwise as seen from above, with -z up in the image
        for (x, z) in [(-s, s), (s, s), (s, -s), (-s, -s)] {
            b.push_vert(vec3(x, y, z), Vec3::Y, vec2(0.0, 0.0));
        }
    }
    b.push_faces([[0, 1, 2], [0, 2, 3], [4, 5, 6], [4, 6, 7]]);
    b.build()
}

#[test]
fn occluder_casts_shadow() {
    let mesh = ground_and_occluder();
    let light_cam = Camera::new((64, 64))
        .look_at(vec3(0.0, 4.0, 0.0), Vec3::ZERO, -Vec3::Z)
        .unwrap();
    let cam = Camera::new((64, 64))
        .look_at(vec3(0.0, 3.0, 3.0), Vec3::ZERO, Vec3::Y)
        .and_then(|c| c.perspective(5.0))
        .unwrap();
    let ctx = Context::default();

    let mut depth = DepthShader::new(&light_cam, &mesh);
    let map: DepthBuf =
        render_to_buf(mesh.nfaces(), &mut depth, &light_cam, &ctx).depth_buf;
    // The occluder is nearer to the light than the ground
    assert_approx_eq!(map.get(32, 32), 1.0);
    assert_approx_eq!(map.get(2, 2), 0.0);

    let mut sh = ShadowShader::new(&cam, &mesh, &light_cam, &map);
    let eye = |p: Vec3| cam.modelview.apply_pt(p);
    assert_eq!(sh.lit(eye(Vec3::ZERO)), 0.0);
    assert_eq!(sh.lit(eye(vec3(0.9, 0.0, 0.9))), 1.0);
    assert_eq!(sh.lit(eye(vec3(0.0, 1.0, 0.0))), 1.0);

    let fb = render_to_buf(mesh.nfaces(), &mut sh, &cam, &ctx);
    let shadowed = cam.project_to_screen(vec3(0.0, 0.0, 0.2)).unwrap();
    let lit = cam.project_to_screen(vec3(0.8, 0.0, 0.8)).unwrap();
    let [s, l] = [shadowed, lit]
        .map(|p| fb.color_buf[[p.x as usize, p.y as usize]]);
    assert!(s.r() < l.r(), "shadowed {s:?}, lit {l:?}");
}

#[test]
fn stats_accumulate_in_context() {
    let cam = Camera::new((16, 16));
    let tri = [
        vec4(-1.0, -1.0, 0.0, 1.0),
        vec4(1.0, -1.0, 0.0, 1.0),
        vec4(-1.0, 1.0, 0.0, 1.0),
    ];
    let ctx = Context::default();
    let mut fb = Framebuf::new(cam.dims);
    fb.clear(&ctx);

    let a = render_ndc(&[tri], &cam, &mut fb, &ctx, Color3::WHITE);
    fb.clear(&ctx);
    let b = render_ndc(&[tri, tri], &cam, &mut fb, &ctx, Color3::WHITE);

    let total = ctx.stats.borrow();
    assert_eq!(total.calls, 2.0);
    assert_eq!(total.prims, Throughput { i: 3, o: 3 });
    assert_eq!(total.verts.i, 9);
    assert_eq!(total.frags.o, a.frags.o + b.frags.o);
    // The second copy of the triangle fails the depth test everywhere
    assert_eq!(b.frags.o, a.frags.o);
}

#[test]
fn vertex_colors_are_interpolated() {
    let cam = Camera::new((64, 64));
    let tri = [
        vec4(-1.0, -1.0, 0.0, 1.0),
        vec4(1.0, -1.0, 0.0, 1.0),
        vec4(-1.0, 1.0, 0.0, 1.0),
    ];
    let colors = [
        rgbf(1.0, 0.0, 0.0),
        rgbf(0.0, 1.0, 0.0),
        rgbf(0.0, 0.0, 1.0),
    ];
    let ctx = Context::default();
    let mut sh = shader::new(
        |_: usize, vert: usize| tri[vert],
        |f: Frag| bary(colors, f.bar).to_color3(),
    );
    let fb = render_to_buf(1, &mut sh, &cam, &ctx);

    // Each corner takes the color of its vertex
    let [a, b, c] = [[1, 1], [61, 1], [1, 61]].map(|p| fb.color_buf[p]);
    assert!(a.r() > 240 && a.g() < 16 && a.b() < 16, "{a:?}");
    assert!(b.g() > 240 && b.r() < 16 && b.b() < 16, "{b:?}");
    assert!(c.b() > 240 && c.r() < 16 && c.g() < 16, "{c:?}");

    // Halfway along the hypotenuse, green and blue mix evenly
    let mid = fb.color_buf[[31, 31]];
    assert!(mid.r() < 8, "{mid:?}");
    assert!(mid.g().abs_diff(mid.b()) <= 1, "{mid:?}");
}

#[cfg(feature = "parallel")]
#[test]
fn shadow_passes_render_with_parallel_scan() {
    fn is_sync<T: Sync>(_: &T) {}

    let mesh = ground_and_occluder();
    let light_cam = Camera::new((64, 64))
        .look_at(vec3(0.0, 4.0, 0.0), Vec3::ZERO, -Vec3::Z)
        .unwrap();
    let cam = Camera::new((64, 64))
        .look_at(vec3(0.0, 3.0, 3.0), Vec3::ZERO, Vec3::Y)
        .and_then(|c| c.perspective(5.0))
        .unwrap();
    let ctx = Context::default();

    let mut depth = DepthShader::new(&light_cam, &mesh);
    is_sync(&depth);
    let map = render_to_buf(mesh.nfaces(), &mut depth, &light_cam, &ctx)
        .depth_buf;

    let mut sh = ShadowShader::new(&cam, &mesh, &light_cam, &map);
    is_sync(&sh);
    let fb = render_to_buf(mesh.nfaces(), &mut sh, &cam, &ctx);

    assert!(ctx.stats.borrow().frags.o > 0);
    assert_ne!(count(&fb.color_buf, Color3::BLACK), 64 * 64);
}
