//! Per-channel intensity histograms.

use crate::imaging::PixelImage;
use serde::Serialize;

/// Number of bins; one per 8-bit intensity.
pub const BIN_COUNT: usize = 256;

/// 256-bin counts for each channel of an image.
///
/// Grayscale images have one channel, RGB images three (R, G, B in order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Histogram {
    channels: Vec<Vec<u64>>,
}

impl Histogram {
    /// Bin indices `0..=255`, paired positionally with each channel's counts.
    pub fn bins() -> impl Iterator<Item = u8> {
        0..=u8::MAX
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Counts for channel `index`. Panics if the channel does not exist.
    pub fn channel(&self, index: usize) -> &[u64] {
        &self.channels[index]
    }

    pub fn channels(&self) -> &[Vec<u64>] {
        &self.channels
    }

    /// Number of samples counted in a channel (the image's pixel count).
    pub fn total(&self, index: usize) -> u64 {
        self.channels[index].iter().sum()
    }

    /// Mean intensity of a channel, or `None` for an empty image.
    pub fn mean(&self, index: usize) -> Option<f64> {
        let total = self.total(index);
        if total == 0 {
            return None;
        }
        let weighted: u64 = self.channels[index]
            .iter()
            .enumerate()
            .map(|(bin, &count)| bin as u64 * count)
            .sum();
        Some(weighted as f64 / total as f64)
    }

    /// Most populated bin of a channel (lowest bin wins ties), `None` when empty.
    pub fn peak(&self, index: usize) -> Option<u8> {
        let counts = &self.channels[index];
        let (bin, &count) = counts
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, count)| **count)?;
        (count > 0).then_some(bin as u8)
    }
}

/// Count samples per intensity, separately for each channel.
pub fn rgb_histogram(image: &PixelImage) -> Histogram {
    let mut channels = vec![vec![0u64; BIN_COUNT]; image.channels()];
    for pixel in image.pixels() {
        for (counts, &value) in channels.iter_mut().zip(pixel) {
            counts[value as usize] += 1;
        }
    }
    Histogram { channels }
}
