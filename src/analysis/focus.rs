//! Focus peaking.
//!
//! Sharp regions are found with a two-stage unsharp-style detector on the
//! luminance plane:
//!
//! ```text
//! high  = luma - blur(luma, σ = 10)                    // strip low-frequency tone
//! local = blur(high, σ = radius, taps = 4·radius + 1)  // local mean of that detail
//! resp  = |high - local| · amount
//! mark  where resp >= threshold
//! ```
//!
//! The first blur removes gradients and broad shapes so only texture and
//! edges survive; the second measures how much each pixel deviates from its
//! immediate neighbourhood within that detail signal. Fine, in-focus detail
//! produces large deviations; defocused areas stay smooth.
//!
//! The parameters depend on resolution. The defaults suit typical camera
//! JPEGs; very large or very small images need different values.

use super::filters::{Border, gaussian_blur, luma};
use super::mask::Mask;
use crate::imaging::PixelImage;
use serde::{Deserialize, Serialize};

/// Spatial scale of the high-pass stage.
const HIGHPASS_SIGMA: f64 = 10.0;
/// The high-pass kernel is cut off at this many sigmas.
const HIGHPASS_TRUNCATE: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FocusParams {
    /// Radius of the local blur; the kernel spans `4 * radius + 1` pixels.
    pub radius: u32,
    /// Gain applied to the local deviation before thresholding.
    pub amount: f64,
    /// Minimum amplified deviation for a pixel to count as sharp.
    pub threshold: f64,
}

impl Default for FocusParams {
    fn default() -> Self {
        Self {
            radius: 1,
            amount: 500.0,
            threshold: 6000.0,
        }
    }
}

/// Per-pixel sharpness response `|high - blur(high)| · amount`.
pub fn sharpness_response(image: &PixelImage, params: &FocusParams) -> Vec<f64> {
    let data = luma(image);

    let highpass_radius = (HIGHPASS_TRUNCATE * HIGHPASS_SIGMA + 0.5) as usize;
    let lowpass = gaussian_blur(&data, HIGHPASS_SIGMA, highpass_radius, Border::Reflect);
    let highpass = data.sub(&lowpass);

    let radius = params.radius as usize;
    let local = gaussian_blur(
        &highpass,
        f64::from(params.radius),
        2 * radius,
        Border::Reflect101,
    );

    highpass
        .data()
        .iter()
        .zip(local.data())
        .map(|(h, l)| ((h - l) * params.amount).abs())
        .collect()
}

/// Mark pixels whose sharpness response reaches `params.threshold`.
pub fn focus_peak(image: &PixelImage, params: &FocusParams) -> Mask {
    let response = sharpness_response(image, params);
    Mask::from_fn(image.width(), image.height(), |i| {
        response[i] >= params.threshold
    })
}
