//! Floating-point planes and separable Gaussian blur.
//!
//! Focus peaking works on a single luminance plane in `f64`. Blurs are
//! separable (rows, then columns) with a normalised 1-D Gaussian kernel, and
//! edges are handled by mirroring according to a [`Border`] mode.

use crate::imaging::PixelImage;

/// Rec. 601 luma weights for R, G, B.
const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// Edge extension used when the kernel reaches past the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    /// Mirror including the edge sample: `d c b a | a b c d | d c b a`.
    Reflect,
    /// Mirror about the edge sample: `d c b | a b c d | c b a`.
    Reflect101,
}

impl Border {
    /// Map an out-of-range coordinate back into `0..len`.
    fn index(self, i: isize, len: usize) -> usize {
        let n = len as isize;
        if (0..n).contains(&i) {
            return i as usize;
        }
        match self {
            Border::Reflect => {
                let m = i.rem_euclid(2 * n);
                (if m < n { m } else { 2 * n - 1 - m }) as usize
            }
            Border::Reflect101 => {
                if n == 1 {
                    return 0;
                }
                let period = 2 * n - 2;
                let m = i.rem_euclid(period);
                (if m < n { m } else { period - m }) as usize
            }
        }
    }
}

/// Row-major 2-D buffer of `f64` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Plane {
    pub fn new(width: usize, height: usize, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), width * height, "plane data does not match shape");
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.width + x]
    }

    /// Element-wise `self - other`.
    pub fn sub(&self, other: &Plane) -> Plane {
        assert_eq!(
            (self.width, self.height),
            (other.width, other.height),
            "plane shapes differ"
        );
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a - b)
            .collect();
        Plane::new(self.width, self.height, data)
    }
}

/// Single luminance plane of an image.
///
/// Grayscale samples are used as-is. RGB pixels are weighted with Rec. 601
/// coefficients and rounded to the nearest 8-bit level, as an 8-bit gray
/// conversion would.
pub fn luma(image: &PixelImage) -> Plane {
    let data = if image.is_grayscale() {
        image.samples().iter().map(|&v| f64::from(v)).collect()
    } else {
        image
            .pixels()
            .map(|px| {
                px.iter()
                    .zip(LUMA_WEIGHTS)
                    .map(|(&v, w)| f64::from(v) * w)
                    .sum::<f64>()
                    .round()
            })
            .collect()
    };
    Plane::new(image.width() as usize, image.height() as usize, data)
}

/// Normalised 1-D Gaussian with `2 * radius + 1` taps.
///
/// A zero radius or non-positive sigma yields the identity kernel `[1.0]`.
pub fn gaussian_kernel(sigma: f64, radius: usize) -> Vec<f64> {
    if radius == 0 || sigma <= 0.0 {
        return vec![1.0];
    }
    let denom = 2.0 * sigma * sigma;
    let r = radius as isize;
    let weights: Vec<f64> = (-r..=r)
        .map(|i| (-((i * i) as f64) / denom).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Blur `plane` with a separable Gaussian of the given sigma and radius.
pub fn gaussian_blur(plane: &Plane, sigma: f64, radius: usize, border: Border) -> Plane {
    let kernel = gaussian_kernel(sigma, radius);
    if kernel.len() == 1 || plane.data.is_empty() {
        return plane.clone();
    }
    let rows = convolve_rows(plane, &kernel, border);
    convolve_cols(&rows, &kernel, border)
}

fn convolve_rows(plane: &Plane, kernel: &[f64], border: Border) -> Plane {
    let (w, h) = (plane.width, plane.height);
    let r = (kernel.len() / 2) as isize;
    let mut out = Vec::with_capacity(w * h);
    for y in 0..h {
        let row = &plane.data[y * w..(y + 1) * w];
        for x in 0..w as isize {
            let acc: f64 = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| weight * row[border.index(x + k as isize - r, w)])
                .sum();
            out.push(acc);
        }
    }
    Plane::new(w, h, out)
}

fn convolve_cols(plane: &Plane, kernel: &[f64], border: Border) -> Plane {
    let (w, h) = (plane.width, plane.height);
    let r = (kernel.len() / 2) as isize;
    let mut out = Vec::with_capacity(w * h);
    for y in 0..h as isize {
        for x in 0..w {
            let acc: f64 = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| {
                    weight * plane.data[border.index(y + k as isize - r, h) * w + x]
                })
                .sum();
            out.push(acc);
        }
    }
    Plane::new(w, h, out)
}
