//! In-memory 8-bit raster shared by every analyzer.
//!
//! A [`PixelImage`] is row-major and interleaved: `height × width × channels`
//! samples, with `channels` either 1 (grayscale) or 3 (R, G, B). Once built it
//! is never mutated, so any number of analyzers may borrow it at once.

use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShapeError {
    #[error("unsupported channel count {0} (expected 1 or 3)")]
    Channels(usize),
    #[error("sample buffer has {actual} values, expected {expected} for {width}x{height}x{channels}")]
    Length {
        width: u32,
        height: u32,
        channels: usize,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelImage {
    width: u32,
    height: u32,
    channels: usize,
    samples: Vec<u8>,
}

impl PixelImage {
    /// Wrap an interleaved sample buffer, checking it matches the declared shape.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: usize,
        samples: Vec<u8>,
    ) -> Result<Self, ShapeError> {
        if channels != 1 && channels != 3 {
            return Err(ShapeError::Channels(channels));
        }
        let expected = width as usize * height as usize * channels;
        if samples.len() != expected {
            return Err(ShapeError::Length {
                width,
                height,
                channels,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Convert a decoded image into 8-bit grayscale or RGB samples.
    ///
    /// Colour-less formats (luma, luma+alpha) stay single-channel. Everything
    /// else becomes RGB; alpha is discarded and deeper samples are reduced to
    /// 8 bits.
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        if img.color().has_color() {
            let rgb = img.to_rgb8();
            Self {
                width: rgb.width(),
                height: rgb.height(),
                channels: 3,
                samples: rgb.into_raw(),
            }
        } else {
            let luma = img.to_luma8();
            Self {
                width: luma.width(),
                height: luma.height(),
                channels: 1,
                samples: luma.into_raw(),
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn is_grayscale(&self) -> bool {
        self.channels == 1
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// All samples, row-major and channel-interleaved.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Channel samples of the pixel at `(x, y)`.
    ///
    /// Panics when the coordinate is outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let start = (y as usize * self.width as usize + x as usize) * self.channels;
        &self.samples[start..start + self.channels]
    }

    /// Iterate over pixels as channel slices, row by row.
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.samples.chunks_exact(self.channels)
    }
}
