// src/visualization/peak_map.rs
//
// Spectrogram image with the detected peaks marked, for eyeballing how
// dense and well spread the landmarks are.

use image::{ImageBuffer, Rgb, RgbImage};
use std::path::Path;

use crate::core::{Peak, SpectrogramMatrix};
use crate::error::{FingerprintError, Result};

const PEAK_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const MARKER_ARM: i64 = 2;

/// Draw the spectrogram (low frequencies at the bottom) with each peak as a
/// small cross.
pub fn render_peak_map(matrix: &SpectrogramMatrix, peaks: &[Peak]) -> Result<RgbImage> {
    let (min, max) = matrix
        .value_range()
        .ok_or_else(|| FingerprintError::Image("empty spectrogram, nothing to draw".to_string()))?;
    let span = if max > min { max - min } else { 1.0 };

    let width = matrix.windows() as u32;
    let height = matrix.bins() as u32;
    let mut img: RgbImage = ImageBuffer::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let bin = (height - 1 - y) as usize;
        let value = (matrix.get(bin, x as usize) - min) / span;
        let (r, g, b) = value_to_color(value);
        *pixel = Rgb([r, g, b]);
    }

    for peak in peaks {
        let x = peak.time as i64;
        let y = height as i64 - 1 - peak.frequency as i64;
        for d in -MARKER_ARM..=MARKER_ARM {
            put(&mut img, x + d, y);
            put(&mut img, x, y + d);
        }
    }

    Ok(img)
}

/// Render and save as PNG
pub fn save_peak_map(matrix: &SpectrogramMatrix, peaks: &[Peak], output_path: &Path) -> Result<()> {
    let img = render_peak_map(matrix, peaks)?;
    img.save(output_path)
        .map_err(|e| FingerprintError::Image(format!("{}: {}", output_path.display(), e)))
}

fn put(img: &mut RgbImage, x: i64, y: i64) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, PEAK_COLOR);
    }
}

fn value_to_color(value: f64) -> (u8, u8, u8) {
    // Magma-like ramp: black, purple, orange, pale yellow
    let v = value.clamp(0.0, 1.0);

    if v < 0.25 {
        let t = v / 0.25;
        ((t * 20.0) as u8, 0, (t * 50.0) as u8)
    } else if v < 0.5 {
        let t = (v - 0.25) / 0.25;
        ((20.0 + t * 100.0) as u8, (t * 20.0) as u8, (50.0 + t * 80.0) as u8)
    } else if v < 0.75 {
        let t = (v - 0.5) / 0.25;
        ((120.0 + t * 100.0) as u8, (20.0 + t * 140.0) as u8, (130.0 - t * 100.0) as u8)
    } else {
        let t = (v - 0.75) / 0.25;
        ((220.0 + t * 35.0) as u8, (160.0 + t * 80.0) as u8, (30.0 + t * 60.0) as u8)
    }
}
