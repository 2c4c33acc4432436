//! Renders a sphere with each of the shaders of `softrast` and writes
//! the images to PPM files in the current directory.

use std::f64::consts::TAU;

use sr::prelude::*;
use sr::render::{cam, render_to_buf};
use sr::render::shaders::{
    FlatShader, NormalMapShader, PhongShader, TangentShader,
};
use sr::util::pnm::save_ppm;
use sr_geom::solids::Octosphere;

const DIMS: Dims = (512, 512);

/// Encodes the unit vector `n` as a normal map color.
fn encode(n: Vec3) -> Color3 {
    let [r, g, b] = [n.x, n.y, n.z].map(|c| ((c + 1.0) / 2.0 * 255.0) as u8);
    rgb(r, g, b)
}

fn checker() -> Texture {
    Texture::from(Buf2::new_with(64, 64, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            rgb(0xE0, 0x60, 0x30)
        } else {
            rgb(0xF0, 0xE0, 0xC0)
        }
    }))
}

/// Concentric ripples in tangent space.
fn ripples() -> Texture {
    Texture::from(Buf2::new_with(256, 256, |x, y| {
        let (u, v) = (x as f64 / 256.0 - 0.5, y as f64 / 256.0 - 0.5);
        let r = (u * u + v * v).sqrt().max(1e-6);
        let slope = 0.5 * (r * 6.0 * TAU).sin();
        encode(vec3(-slope * u / r, -slope * v / r, 1.0).normalize())
    }))
}

/// Sphere normals in object space, seen along -z, with a bumpy band.
fn bumps() -> Texture {
    Texture::from(Buf2::new_with(256, 256, |x, y| {
        let (nx, ny) = (x as f64 / 128.0 - 1.0, y as f64 / 128.0 - 1.0);
        let nz = (1.0 - nx * nx - ny * ny).max(0.0).sqrt();
        let bump = 0.3 * (ny * 4.0 * TAU).sin();
        encode(vec3(nx, ny + bump, nz).normalize())
    }))
}

fn save(name: &str, mut fb: Framebuf) {
    // Screen y grows upward, image rows downward
    fb.color_buf.flip_vertically();
    if let Err(e) = save_ppm(name, &fb.color_buf) {
        eprintln!("could not write {name}: {e}");
    }
}

fn main() -> Result<(), cam::Error> {
    let sphere = Octosphere { radius: 1.0, depth: 4 }.build();
    let cam = Camera::new(DIMS)
        .look_at(vec3(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y)?
        .perspective(3.0)?;
    let light = vec3(1.0, 1.0, 1.0);
    let n = sphere.nfaces();
    let ctx = Context::default();

    let (checker, ripples, bumps) = (checker(), ripples(), bumps());

    let mut flat = FlatShader::new(&cam, &sphere, light);
    save("flat.ppm", render_to_buf(n, &mut flat, &cam, &ctx));

    let mut phong =
        PhongShader::new(&cam, &sphere, light).with_diffuse(&checker);
    save("phong.ppm", render_to_buf(n, &mut phong, &cam, &ctx));

    let mut normal = NormalMapShader::new(&cam, &sphere, &bumps, light);
    save("normal_map.ppm", render_to_buf(n, &mut normal, &cam, &ctx));

    let mut tangent = TangentShader::new(&cam, &sphere, &ripples, light)
        .with_diffuse(&checker);
    let fb = render_to_buf(n, &mut tangent, &cam, &ctx);
    save("tangent.ppm", fb);

    ctx.stats.borrow_mut().frames += 4.0;
    eprintln!("{}", ctx.stats.borrow());
    Ok(())
}
