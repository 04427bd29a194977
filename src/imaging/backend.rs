//! Image loading trait and shared types.
//!
//! The [`ImageLoader`] trait is the single seam between the analysis code and
//! the filesystem: it turns a path into a fully decoded [`PixelImage`] plus
//! whatever EXIF metadata the file carries. Loaders read the whole file into
//! memory and release the handle before returning, so nothing downstream
//! ever holds an open file.
//!
//! The production implementation is
//! [`RustLoader`](super::rust_backend::RustLoader).

use super::pixels::{PixelImage, ShapeError};
use crate::metadata::Metadata;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("invalid pixel layout: {0}")]
    Shape(#[from] ShapeError),
}

/// A decoded photograph ready for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pub pixels: PixelImage,
    /// `None` when the file has no readable EXIF block.
    pub metadata: Option<Metadata>,
}

impl LoadedImage {
    pub fn new(pixels: PixelImage, metadata: Option<Metadata>) -> Self {
        Self { pixels, metadata }
    }

    /// Metadata, or an empty map when the file carried none.
    pub fn metadata_or_empty(&self) -> Metadata {
        self.metadata.clone().unwrap_or_default()
    }
}

/// Trait for image loaders.
///
/// `Sync` so one loader can be shared across rayon workers.
pub trait ImageLoader: Sync {
    /// Decode the image at `path` and extract its metadata.
    fn load(&self, path: &Path) -> Result<LoadedImage, LoadError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::metadata::TagValue;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Loader serving canned images by path and recording each request.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockLoader {
        pub images: HashMap<PathBuf, LoadedImage>,
        pub requests: Mutex<Vec<PathBuf>>,
    }

    impl MockLoader {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_image(mut self, path: &str, image: LoadedImage) -> Self {
            self.images.insert(PathBuf::from(path), image);
            self
        }

        pub fn get_requests(&self) -> Vec<PathBuf> {
            let mut requests = self.requests.lock().unwrap().clone();
            requests.sort();
            requests
        }
    }

    impl ImageLoader for MockLoader {
        fn load(&self, path: &Path) -> Result<LoadedImage, LoadError> {
            self.requests.lock().unwrap().push(path.to_path_buf());

            self.images.get(path).cloned().ok_or_else(|| LoadError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no mock image"),
            })
        }
    }

    fn gray_pixels() -> PixelImage {
        PixelImage::from_raw(2, 2, 1, vec![0, 64, 128, 255]).unwrap()
    }

    #[test]
    fn metadata_or_empty_without_exif() {
        let loaded = LoadedImage::new(gray_pixels(), None);
        assert!(loaded.metadata_or_empty().is_empty());
    }

    #[test]
    fn metadata_or_empty_with_exif() {
        let mut meta = Metadata::new();
        meta.insert("Make", TagValue::Text("Leica".into()));
        let loaded = LoadedImage::new(gray_pixels(), Some(meta.clone()));
        assert_eq!(loaded.metadata_or_empty(), meta);
    }

    #[test]
    fn mock_records_requests() {
        let loader = MockLoader::new().with_image("/a.jpg", LoadedImage::new(gray_pixels(), None));

        assert!(loader.load(Path::new("/a.jpg")).is_ok());
        assert!(matches!(
            loader.load(Path::new("/missing.jpg")),
            Err(LoadError::Io { .. })
        ));
        assert_eq!(
            loader.get_requests(),
            vec![PathBuf::from("/a.jpg"), PathBuf::from("/missing.jpg")]
        );
    }
}
