//! Renders a sphere floating above a plane, lit by a light that casts
//! shadows, and writes the image and the shadow map to PPM files.

use sr::prelude::*;
use sr::render::shaders::{DepthShader, ShadowShader};
use sr::render::{cam, render_to_buf};
use sr::util::pnm::save_ppm;
use sr_geom::solids::{Octosphere, Plane};

/// Returns a mesh containing the faces of both `a` and `b`.
fn merge(mut a: Mesh, b: Mesh) -> Mesh {
    let offset = a.verts.len();
    a.faces.extend(b.faces.into_iter().map(|f| f.map(|i| i + offset)));
    a.verts.extend(b.verts);
    a
}

fn save(name: &str, mut buf: Buf2<Color3>) {
    buf.flip_vertically();
    if let Err(e) = save_ppm(name, &buf) {
        eprintln!("could not write {name}: {e}");
    }
}

fn main() -> Result<(), cam::Error> {
    let sphere = Octosphere { radius: 0.6, depth: 4 }
        .build()
        .transform(&translate(vec3(0.0, 1.0, 0.0)));
    let ground = Plane { size: 2.0, divs: 8 }.build();
    let scene = merge(ground, sphere);
    let n = scene.nfaces();
    let ctx = Context::default();

    let light_cam = Camera::new((1024, 1024))
        .look_at(vec3(1.0, 3.0, 1.0), Vec3::ZERO, Vec3::Y)?
        .model(&scale(vec3(0.4, 0.4, 0.4)))?;
    let cam = Camera::new((640, 480))
        .look_at(vec3(0.0, 2.5, 4.0), vec3(0.0, 0.5, 0.0), Vec3::Y)?
        .perspective(6.0)?
        .viewport(80, 0, 480, 480);

    // Pass 1: depth as seen by the light
    let mut depth = DepthShader::new(&light_cam, &scene);
    let shadow_fb = render_to_buf(n, &mut depth, &light_cam, &ctx);

    // Pass 2: the scene, shadowed
    let shadow_map = &shadow_fb.depth_buf;
    let mut shadow = ShadowShader::new(&cam, &scene, &light_cam, shadow_map);
    let fb = render_to_buf(n, &mut shadow, &cam, &ctx);

    ctx.stats.borrow_mut().frames += 1.0;
    eprintln!("{}", ctx.stats.borrow());

    save("shadow_map.ppm", shadow_fb.depth_buf.to_image());
    save("shadows.ppm", fb.color_buf);
    Ok(())
}
