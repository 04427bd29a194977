//! Pure Rust loader: the `image` crate for pixels, `kamadak-exif` for metadata.
//!
//! ## Crate mapping
//!
//! | Step | Crate / function |
//! |---|---|
//! | Read file | `std::fs::read` (whole file, handle closed immediately) |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | 8-bit gray / RGB | [`PixelImage::from_dynamic`] |
//! | EXIF | [`read_exif`](super::exif_reader::read_exif) |

use super::backend::{ImageLoader, LoadError, LoadedImage};
use super::exif_reader::read_exif;
use super::pixels::PixelImage;
use image::{ImageFormat, ImageReader};
use log::{debug, warn};
use std::io::Cursor;
use std::path::Path;
use std::sync::LazyLock;

const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// True when the path's extension names a decodable format (case-insensitive).
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Loader backed by the `image` crate ecosystem.
pub struct RustLoader;

impl RustLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(path: &Path, data: &[u8]) -> Result<PixelImage, LoadError> {
    let decode_err = |message: String| LoadError::Decode {
        path: path.to_path_buf(),
        message,
    };
    let img = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| decode_err(e.to_string()))?
        .decode()
        .map_err(|e| decode_err(e.to_string()))?;
    Ok(PixelImage::from_dynamic(&img))
}

impl ImageLoader for RustLoader {
    fn load(&self, path: &Path) -> Result<LoadedImage, LoadError> {
        let data = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let pixels = decode(path, &data)?;
        debug!(
            "decoded {} ({}x{}, {} channel(s))",
            path.display(),
            pixels.width(),
            pixels.height(),
            pixels.channels()
        );

        let metadata = match read_exif(&data) {
            Ok(meta) if !meta.is_empty() => Some(meta),
            Ok(_) => {
                warn!("No EXIF data found in {}", path.display());
                None
            }
            Err(e) => {
                warn!("No EXIF data found in {}: {e}", path.display());
                None
            }
        };

        Ok(LoadedImage::new(pixels, metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{write_test_jpeg, write_test_png_gray};

    #[test]
    fn supported_extensions_match_decodable_formats() {
        let exts = supported_input_extensions();
        for expected in &["jpg", "jpeg", "png", "tif", "tiff", "webp"] {
            assert!(
                exts.contains(expected),
                "expected {expected} in supported extensions"
            );
        }
    }

    #[test]
    fn is_supported_image_ignores_case() {
        assert!(is_supported_image(Path::new("a/B.JPG")));
        assert!(is_supported_image(Path::new("scan.tiff")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }

    #[test]
    fn load_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        write_test_jpeg(&path, 64, 48);

        let loaded = RustLoader::new().load(&path).unwrap();
        assert_eq!(loaded.pixels.width(), 64);
        assert_eq!(loaded.pixels.height(), 48);
        assert_eq!(loaded.pixels.channels(), 3);
    }

    #[test]
    fn synthetic_jpeg_has_no_metadata() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        write_test_jpeg(&path, 16, 16);

        let loaded = RustLoader::new().load(&path).unwrap();
        assert_eq!(loaded.metadata, None);
        assert!(loaded.metadata_or_empty().is_empty());
    }

    #[test]
    fn grayscale_png_loads_single_channel() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("gray.png");
        write_test_png_gray(&path, 10, 5, 200);

        let loaded = RustLoader::new().load(&path).unwrap();
        assert!(loaded.pixels.is_grayscale());
        assert!(loaded.pixels.samples().iter().all(|&v| v == 200));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = RustLoader::new().load(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn garbage_file_is_decode_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.jpg");
        std::fs::write(&path, b"this is not a jpeg").unwrap();

        let result = RustLoader::new().load(&path);
        assert!(matches!(result, Err(LoadError::Decode { .. })));
    }
}
