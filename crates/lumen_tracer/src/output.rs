//! Conversion of the running mean for display and storage.

use std::path::Path;

use lumen_core::Color;
use lumen_math::{Float, Interval};
use thiserror::Error;

use crate::accumulator::Accumulator;

/// Display gamma applied when quantizing to 8 bits.
const DISPLAY_GAMMA: Float = 2.2;

/// Errors from writing images.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot write an empty {width}x{height} image")]
    EmptyImage { width: u32, height: u32 },
}

/// Apply display gamma to a linear value in [0, 1].
#[inline]
fn linear_to_gamma(linear: Float) -> Float {
    Interval::UNIT.clamp(linear).powf(1.0 / DISPLAY_GAMMA)
}

/// Convert a linear color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let quantize = |c: Float| (linear_to_gamma(c) * 255.0 + 0.5) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z), 255]
}

/// Tone-mapped RGBA bytes of the running mean, row-major, top row first.
pub fn to_rgba8(accumulator: &Accumulator) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(accumulator.pixels().len() * 4);
    for color in accumulator.pixels() {
        bytes.extend_from_slice(&color_to_rgba(*color));
    }
    bytes
}

/// Linear RGBA32F bytes of the running mean, ready for a float texture upload.
pub fn rgba32f_bytes(accumulator: &Accumulator) -> Vec<u8> {
    let texels: Vec<[f32; 4]> = accumulator
        .pixels()
        .iter()
        .map(|c| [c.x as f32, c.y as f32, c.z as f32, 1.0])
        .collect();
    bytemuck::cast_slice(&texels).to_vec()
}

/// Write the running mean as a gamma-corrected PNG.
pub fn write_png<P: AsRef<Path>>(accumulator: &Accumulator, path: P) -> Result<(), OutputError> {
    let (width, height) = (accumulator.width(), accumulator.height());
    let image = image::RgbaImage::from_raw(width, height, to_rgba8(accumulator))
        .filter(|_| width > 0 && height > 0)
        .ok_or(OutputError::EmptyImage { width, height })?;

    image.save_with_format(path.as_ref(), image::ImageFormat::Png)?;
    log::info!(
        "Wrote {}x{} image ({} spp) to {:?}",
        width,
        height,
        accumulator.sample_count(),
        path.as_ref()
    );
    Ok(())
}
