//! # photodiag
//!
//! Diagnostic overlays for photographs. Given an image, compute what a
//! photographer checks before keeping a frame:
//!
//! - a 256-bin histogram per channel,
//! - a mask of blown highlights,
//! - a focus-peaking mask of pixels with strong fine detail,
//! - a composition grid scaled to the image's pixel dimensions.
//!
//! # Architecture
//!
//! ```text
//! file ──ImageLoader──▶ PixelImage + Metadata
//!                            │
//!                            ├─▶ rgb_histogram   ─┐
//!                            ├─▶ highlight_clip  ─┤
//!                            ├─▶ focus_peak      ─┼─▶ Diagnosis ─▶ Report / text
//!  GridCatalog ─▶ NormalizedGrid ─▶ scale_grid   ─┘
//! ```
//!
//! Analyzers are pure functions over a borrowed, immutable [`imaging::PixelImage`].
//! Loading is the only I/O and sits behind the [`imaging::ImageLoader`] trait,
//! so everything downstream is testable with in-memory images.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Decoding files into 8-bit gray/RGB pixels, EXIF extraction |
//! | [`metadata`] | Tag name → value map and the shooting-settings summary |
//! | [`analysis`] | Histogram, highlight clipping, focus peaking, Gaussian filters |
//! | [`grid`] | Grid CSV parsing, built-in presets, scaling to pixel space |
//! | [`diagnose`] | Runs the analyzers concurrently, per image and per batch |
//! | [`config`] | `photodiag.toml` loading, validation, and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit Masks
//!
//! Masks hold [`analysis::MaskCell`] values rather than numeric sentinels.
//! A renderer decides how an unset cell looks; the analyzers only say which
//! pixels are marked.
//!
//! ## Explicit Resource Paths
//!
//! Grid files are looked up in a directory the caller passes in, never the
//! process working directory. Without one, only the built-in presets exist.
//!
//! ## Missing Metadata Is Not An Error
//!
//! Plenty of valid files carry no EXIF (scans, exports, screenshots). The
//! loader returns `None` and logs a warning instead of failing the image.

pub mod analysis;
pub mod config;
pub mod diagnose;
pub mod grid;
pub mod imaging;
pub mod metadata;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
