//! Shared test utilities.
//!
//! In-memory image builders for analyzer tests, plus writers that put small
//! synthetic JPEG and PNG files on disk for loader tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let white = uniform_rgb(8, 8, [255, 255, 255]);
//! let ramp = gray_image(16, 1, |x, _| (x * 16) as u8);
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! write_test_jpeg(&tmp.path().join("a.jpg"), 64, 48);
//! ```

use crate::imaging::PixelImage;
use image::{GrayImage, ImageEncoder, RgbImage};
use std::path::Path;

// =========================================================================
// In-memory images
// =========================================================================

/// Grayscale image where every sample is `value`.
pub fn uniform_gray(width: u32, height: u32, value: u8) -> PixelImage {
    gray_image(width, height, |_, _| value)
}

/// RGB image where every pixel is `rgb`.
pub fn uniform_rgb(width: u32, height: u32, rgb: [u8; 3]) -> PixelImage {
    rgb_image(width, height, |_, _| rgb)
}

/// Grayscale image with samples from `f(x, y)`.
pub fn gray_image(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> PixelImage {
    let mut samples = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            samples.push(f(x, y));
        }
    }
    PixelImage::from_raw(width, height, 1, samples)
        .unwrap_or_else(|e| panic!("bad gray test image {width}x{height}: {e}"))
}

/// RGB image with pixels from `f(x, y)`.
pub fn rgb_image(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 3]) -> PixelImage {
    let mut samples = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            samples.extend_from_slice(&f(x, y));
        }
    }
    PixelImage::from_raw(width, height, 3, samples)
        .unwrap_or_else(|e| panic!("bad rgb test image {width}x{height}: {e}"))
}

// =========================================================================
// Files on disk
// =========================================================================

/// Write a gradient JPEG with no EXIF segment.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path)
        .unwrap_or_else(|e| panic!("cannot create {}: {e}", path.display()));
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a single-valued 8-bit grayscale PNG.
pub fn write_test_png_gray(path: &Path, width: u32, height: u32, value: u8) {
    GrayImage::from_pixel(width, height, image::Luma([value]))
        .save(path)
        .unwrap_or_else(|e| panic!("cannot write {}: {e}", path.display()));
}
