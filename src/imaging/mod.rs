//! Image loading in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, TIFF, WebP) |
//! | **EXIF metadata** | `kamadak-exif` |
//! | **Pixel layout** | [`PixelImage`]: 8-bit gray or interleaved RGB |
//!
//! The module is split into:
//! - **Pixels**: the immutable raster every analyzer reads
//! - **Backend**: [`ImageLoader`] trait + [`LoadedImage`]
//! - **Rust backend**: [`RustLoader`], the production loader
//! - **EXIF reader**: EXIF fields → [`Metadata`](crate::metadata::Metadata)

pub mod backend;
mod exif_reader;
pub mod pixels;
pub mod rust_backend;

pub use backend::{ImageLoader, LoadError, LoadedImage};
pub use pixels::{PixelImage, ShapeError};
pub use rust_backend::{RustLoader, is_supported_image, supported_input_extensions};
