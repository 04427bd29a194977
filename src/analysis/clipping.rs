//! Highlight clipping warning.
//!
//! A pixel is clipped when its brightest channel reaches `threshold`. For
//! RGB images that is `max(R, G, B) >= threshold`, so a blown red channel
//! counts even when green and blue still hold detail. Grayscale images
//! compare the single sample directly.

use super::mask::Mask;
use crate::imaging::PixelImage;

pub const DEFAULT_CLIP_THRESHOLD: u8 = 250;

/// Mark every pixel whose channel maximum is at or above `threshold`.
pub fn highlight_clip(image: &PixelImage, threshold: u8) -> Mask {
    let peaks: Vec<u8> = image
        .pixels()
        .map(|px| px.iter().copied().max().unwrap_or(0))
        .collect();
    Mask::from_fn(image.width(), image.height(), |i| peaks[i] >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gray_image, rgb_image, uniform_gray, uniform_rgb};

    #[test]
    fn all_white_rgb_is_fully_clipped() {
        let mask = highlight_clip(&uniform_rgb(8, 6, [255, 255, 255]), DEFAULT_CLIP_THRESHOLD);
        assert_eq!(mask.marked_count(), 48);
    }

    #[test]
    fn all_black_rgb_is_not_clipped() {
        let mask = highlight_clip(&uniform_rgb(8, 6, [0, 0, 0]), DEFAULT_CLIP_THRESHOLD);
        assert_eq!(mask.marked_count(), 0);
    }

    #[test]
    fn single_channel_saturation_counts() {
        let img = rgb_image(2, 1, |x, _| if x == 0 { [252, 10, 10] } else { [249, 249, 249] });
        let mask = highlight_clip(&img, 250);
        assert!(mask.is_marked(0, 0));
        assert!(!mask.is_marked(1, 0));
    }

    #[test]
    fn threshold_is_inclusive() {
        let img = gray_image(3, 1, |x, _| [249, 250, 251][x as usize]);
        let mask = highlight_clip(&img, 250);
        assert!(!mask.is_marked(0, 0));
        assert!(mask.is_marked(1, 0));
        assert!(mask.is_marked(2, 0));
    }

    #[test]
    fn grayscale_uses_sample_directly() {
        let mask = highlight_clip(&uniform_gray(5, 5, 255), DEFAULT_CLIP_THRESHOLD);
        assert_eq!((mask.width(), mask.height()), (5, 5));
        assert_eq!(mask.marked_count(), 25);
    }

    #[test]
    fn zero_threshold_marks_everything() {
        let mask = highlight_clip(&uniform_gray(3, 3, 0), 0);
        assert_eq!(mask.marked_count(), 9);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let img = rgb_image(7, 7, |x, y| [(x * 40) as u8, (y * 40) as u8, 0]);
        assert_eq!(highlight_clip(&img, 200), highlight_clip(&img, 200));
    }
}
