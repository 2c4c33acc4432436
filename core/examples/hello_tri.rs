use softrast_core::prelude::*;
use softrast_core::render::{render_to_buf, shader};

fn main() {
    let pos = [
        vec3(-1.0, -1.0, 0.0),
        vec3(1.0, -1.0, 0.0),
        vec3(0.0, 1.0, 0.0),
    ];
    let colors = [
        rgbf(1.0, 0.0, 0.0),
        rgbf(0.0, 0.8, 0.0),
        rgbf(0.4, 0.4, 1.0),
    ];

    let dims @ (w, h) = (640, 480);
    let cam = Camera::new(dims)
        .look_at(vec3(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y)
        .and_then(|c| c.perspective(3.0))
        .expect("valid camera")
        // Keep the aspect ratio square
        .viewport((w - h) / 2, 0, h, h);
    let clip = cam.world_to_clip();

    let mut shader = shader::new(
        // Transform vertex position from world to clip space
        |_face: usize, vert: usize| clip.apply(pos[vert].to_pt()),
        // Interpolate vertex colors
        |frag: Frag| bary(colors, frag.bar).to_color3(),
    );

    let ctx = Context::default();
    let mut framebuf = render_to_buf(1, &mut shader, &cam, &ctx);

    let center_pixel = framebuf.color_buf[[w / 2, h / 2]];
    assert_ne!(center_pixel, Color3::BLACK);

    #[cfg(feature = "std")]
    {
        use softrast_core::util::pnm::save_ppm;

        eprintln!("{}", ctx.stats.borrow());
        // Screen y grows upward, image rows downward
        framebuf.color_buf.flip_vertically();
        save_ppm("triangle.ppm", &framebuf.color_buf).unwrap();
    }
    #[cfg(not(feature = "std"))]
    let _ = &mut framebuf;
}
