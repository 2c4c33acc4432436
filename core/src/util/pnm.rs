//! Output of images in the binary PPM (P6) format.
//!
//! PPM is about the simplest true-color image format there is: a short
//! ASCII header giving the magic `P6`, the dimensions, and the maximum
//! channel value, followed by the raw bytes of each pixel, three per
//! pixel, row by row. Most image viewers open it directly.

use alloc::vec::Vec;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::math::Color3;
use crate::util::buf::Buf2;

/// Creates or truncates the file at `path` and writes `buf` to it as PPM.
///
/// # Errors
/// Returns any I/O error raised while creating or writing the file.
pub fn save_ppm(path: impl AsRef<Path>, buf: &Buf2<Color3>) -> io::Result<()> {
    write_ppm(BufWriter::new(File::create(path)?), buf)
}

/// Writes `buf` to `out` as PPM, then flushes `out`.
///
/// Row 0 of `buf` becomes the top row of the image. Rendered images have
/// y growing upward, so they should be flipped vertically first.
///
/// # Errors
/// Returns any I/O error raised by `out`.
pub fn write_ppm(mut out: impl Write, buf: &Buf2<Color3>) -> io::Result<()> {
    let (w, h) = buf.dims();
    writeln!(out, "P6 {w} {h} 255")?;
    for row in buf.rows() {
        let bytes: Vec<u8> = row.iter().flat_map(|c| c.0).collect();
        out.write_all(&bytes)?;
    }
    out.flush()
}
