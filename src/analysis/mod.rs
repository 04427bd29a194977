//! Pixel analyzers.
//!
//! Every analyzer is a pure function of a borrowed [`PixelImage`](crate::imaging::PixelImage):
//! no I/O, no shared state, and identical inputs always give identical output.
//! None depends on another, so they can run side by side on the same image.
//!
//! | Analyzer | Output |
//! |---|---|
//! | [`rgb_histogram`] | [`Histogram`]: 256 bins per channel |
//! | [`highlight_clip`] | [`Mask`] of pixels at or above the clip threshold |
//! | [`focus_peak`] | [`Mask`] of pixels with strong fine detail |

pub mod clipping;
pub mod filters;
pub mod focus;
pub mod histogram;
pub mod mask;

pub use clipping::{DEFAULT_CLIP_THRESHOLD, highlight_clip};
pub use focus::{FocusParams, focus_peak};
pub use histogram::{BIN_COUNT, Histogram, rgb_histogram};
pub use mask::{Mask, MaskCell};
