//! Running the analyzers over photographs.
//!
//! [`diagnose`] runs all four analyzers over one in-memory image. They share
//! the image read-only and have no dependencies on one another, so they run
//! concurrently via nested `rayon::join`.
//!
//! [`diagnose_files`] does the same for a batch of files: each file is loaded
//! (and its handle released) inside a rayon worker, then analysed. A file that
//! fails to load yields an error for that entry alone.
//!
//! The grid overlay is resolved once per batch with [`load_grid`]. If the grid
//! resource is missing or malformed the caller gets a
//! [`ResourceError`] and can still run every other analysis without a grid.

use crate::analysis::{Histogram, Mask, focus_peak, highlight_clip, rgb_histogram};
use crate::config::{ConfigError, DiagConfig, GridConfig};
use crate::grid::{GridCatalog, GridLines, NormalizedGrid, ResourceError, scale_grid};
use crate::imaging::{ImageLoader, LoadError, PixelImage};
use crate::metadata::Metadata;
use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// Failures surfaced to the command line.
#[derive(Error, Debug)]
pub enum DiagnoseError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Grid(#[from] ResourceError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no supported images found")]
    NoImages,
    #[error("{failed} of {total} images could not be analyzed")]
    Failed { failed: usize, total: usize },
}

/// All overlays computed for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub histogram: Histogram,
    pub clipping: Mask,
    pub focus: Mask,
    /// Present when a grid was supplied.
    pub grid: Option<GridLines>,
}

/// A diagnosed file: where it came from, its shape and metadata, and the overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDiagnosis {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    pub metadata: Option<Metadata>,
    pub diagnosis: Diagnosis,
}

/// Run every analyzer on `image`.
pub fn diagnose(
    image: &PixelImage,
    config: &DiagConfig,
    grid: Option<&NormalizedGrid>,
) -> Diagnosis {
    let ((histogram, clipping), (focus, grid)) = rayon::join(
        || {
            rayon::join(
                || rgb_histogram(image),
                || highlight_clip(image, config.clipping.threshold),
            )
        },
        || {
            rayon::join(
                || focus_peak(image, &config.focus),
                || grid.map(|g| scale_grid(g, image.width(), image.height())),
            )
        },
    );

    Diagnosis {
        histogram,
        clipping,
        focus,
        grid,
    }
}

/// Resolve the configured grid, or `None` when the grid overlay is disabled.
pub fn load_grid(config: &GridConfig) -> Result<Option<NormalizedGrid>, ResourceError> {
    if !config.enabled {
        return Ok(None);
    }
    let catalog = match &config.directory {
        Some(dir) => GridCatalog::new(dir),
        None => GridCatalog::builtin(),
    };
    catalog.load(&config.preset).map(Some)
}

/// [`load_grid`], logging a warning and continuing without a grid on failure.
pub fn load_grid_or_warn(config: &GridConfig) -> Option<NormalizedGrid> {
    load_grid(config).unwrap_or_else(|e| {
        warn!(
            "grid '{}' unavailable, continuing without it: {e}",
            config.preset
        );
        None
    })
}

/// Load one file and diagnose it.
pub fn diagnose_file(
    loader: &impl ImageLoader,
    path: &Path,
    config: &DiagConfig,
    grid: Option<&NormalizedGrid>,
) -> Result<ImageDiagnosis, LoadError> {
    let started = Instant::now();
    let loaded = loader.load(path)?;
    let diagnosis = diagnose(&loaded.pixels, config, grid);
    debug!(
        "diagnosed {} in {:.1?}",
        path.display(),
        started.elapsed()
    );

    Ok(ImageDiagnosis {
        path: path.to_path_buf(),
        width: loaded.pixels.width(),
        height: loaded.pixels.height(),
        channels: loaded.pixels.channels(),
        metadata: loaded.metadata,
        diagnosis,
    })
}

/// Diagnose many files in parallel. Results keep the order of `paths`.
pub fn diagnose_files(
    loader: &impl ImageLoader,
    paths: &[PathBuf],
    config: &DiagConfig,
    grid: Option<&NormalizedGrid>,
) -> Vec<Result<ImageDiagnosis, LoadError>> {
    paths
        .par_iter()
        .map(|path| diagnose_file(loader, path, config, grid))
        .collect()
}

// ============================================================================
// Serializable summary
// ============================================================================

/// Summary of one channel's histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelReport {
    pub name: &'static str,
    pub mean: Option<f64>,
    pub peak: Option<u8>,
    pub counts: Vec<u64>,
}

/// Summary of a mask: how many pixels are marked and what fraction that is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaskReport {
    pub marked: usize,
    pub coverage: f64,
}

impl From<&Mask> for MaskReport {
    fn from(mask: &Mask) -> Self {
        Self {
            marked: mask.marked_count(),
            coverage: mask.coverage(),
        }
    }
}

/// Serializable view of an [`ImageDiagnosis`], used for `--json` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    pub histogram: Vec<ChannelReport>,
    pub clipping: MaskReport,
    pub focus: MaskReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridLines>,
}

/// Display name of channel `index` for an image with `count` channels.
pub fn channel_name(count: usize, index: usize) -> &'static str {
    match (count, index) {
        (1, _) => "gray",
        (_, 0) => "red",
        (_, 1) => "green",
        (_, 2) => "blue",
        _ => "other",
    }
}

impl From<&ImageDiagnosis> for Report {
    fn from(image: &ImageDiagnosis) -> Self {
        let hist = &image.diagnosis.histogram;
        let histogram = (0..hist.channel_count())
            .map(|i| ChannelReport {
                name: channel_name(hist.channel_count(), i),
                mean: hist.mean(i),
                peak: hist.peak(i),
                counts: hist.channel(i).to_vec(),
            })
            .collect();

        Self {
            path: image.path.display().to_string(),
            width: image.width,
            height: image.height,
            channels: image.channels,
            metadata: image.metadata.clone(),
            histogram,
            clipping: MaskReport::from(&image.diagnosis.clipping),
            focus: MaskReport::from(&image.diagnosis.focus),
            grid: image.diagnosis.grid.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::LoadedImage;
    use crate::imaging::backend::tests::MockLoader;
    use crate::test_helpers::{gray_image, uniform_rgb};

    fn centre_line() -> NormalizedGrid {
        NormalizedGrid::new(vec![vec![0.5, 0.0, 0.5, 1.0]]).unwrap()
    }

    #[test]
    fn diagnose_runs_every_analyzer() {
        let img = uniform_rgb(200, 100, [255, 255, 255]);
        let grid = centre_line();
        let d = diagnose(&img, &DiagConfig::default(), Some(&grid));

        assert_eq!(d.histogram.channel_count(), 3);
        assert_eq!(d.histogram.channel(0)[255], 20_000);
        assert_eq!(d.clipping.marked_count(), 20_000);
        assert_eq!(d.focus.marked_count(), 0);
        let lines = d.grid.unwrap();
        assert_eq!(lines.x, vec![vec![100.0, 100.0]]);
        assert_eq!(lines.y, vec![vec![0.0, 100.0]]);
    }

    #[test]
    fn diagnose_without_grid() {
        let img = uniform_rgb(4, 4, [0, 0, 0]);
        let d = diagnose(&img, &DiagConfig::default(), None);
        assert_eq!(d.grid, None);
        assert_eq!(d.clipping.marked_count(), 0);
    }

    #[test]
    fn diagnose_is_deterministic() {
        let img = gray_image(24, 24, |x, y| ((x * 11 + y * 7) % 256) as u8);
        let config = DiagConfig::default();
        assert_eq!(diagnose(&img, &config, None), diagnose(&img, &config, None));
    }

    #[test]
    fn diagnose_uses_configured_thresholds() {
        let img = uniform_rgb(3, 3, [200, 10, 10]);
        let mut config = DiagConfig::default();
        config.clipping.threshold = 200;
        assert_eq!(diagnose(&img, &config, None).clipping.marked_count(), 9);
    }

    #[test]
    fn load_grid_disabled_is_none() {
        let config = GridConfig {
            enabled: false,
            ..GridConfig::default()
        };
        assert_eq!(load_grid(&config).unwrap(), None);
    }

    #[test]
    fn load_grid_default_is_thirds() {
        let grid = load_grid(&GridConfig::default()).unwrap().unwrap();
        assert_eq!(grid.rows().len(), 4);
    }

    #[test]
    fn load_grid_unknown_preset_errors() {
        let config = GridConfig {
            preset: "spiral".into(),
            ..GridConfig::default()
        };
        assert!(matches!(
            load_grid(&config),
            Err(ResourceError::NotFound(_))
        ));
    }

    #[test]
    fn unavailable_grid_falls_back_to_none() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("bad.csv"), "0.5,nan,0.5,1\n").unwrap();
        let config = GridConfig {
            preset: "bad".into(),
            directory: Some(tmp.path().to_path_buf()),
            ..GridConfig::default()
        };
        assert!(matches!(
            load_grid(&config),
            Err(ResourceError::NonNumeric { line: 1, .. })
        ));
        assert_eq!(load_grid_or_warn(&config), None);
        assert!(load_grid_or_warn(&GridConfig::default()).is_some());
    }

    #[test]
    fn diagnose_files_isolates_failures() {
        let loader = MockLoader::new().with_image(
            "/ok.jpg",
            LoadedImage::new(uniform_rgb(10, 10, [255, 0, 0]), None),
        );
        let paths = vec![PathBuf::from("/ok.jpg"), PathBuf::from("/missing.jpg")];

        let results = diagnose_files(&loader, &paths, &DiagConfig::default(), None);

        assert_eq!(results.len(), 2);
        let ok = results[0].as_ref().unwrap();
        assert_eq!(ok.path, PathBuf::from("/ok.jpg"));
        assert_eq!(ok.diagnosis.clipping.marked_count(), 100);
        assert!(matches!(results[1], Err(LoadError::Io { .. })));
        // requests arrive in worker order; get_requests() sorts them
        assert_eq!(
            loader.get_requests(),
            vec![PathBuf::from("/missing.jpg"), PathBuf::from("/ok.jpg")]
        );
    }

    #[test]
    fn report_summarises_diagnosis() {
        let loader = MockLoader::new().with_image(
            "/gray.png",
            LoadedImage::new(gray_image(2, 2, |x, _| if x == 0 { 255 } else { 0 }), None),
        );
        let image = diagnose_file(&loader, Path::new("/gray.png"), &DiagConfig::default(), None)
            .unwrap();

        let report = Report::from(&image);
        assert_eq!(report.channels, 1);
        assert_eq!(report.histogram.len(), 1);
        assert_eq!(report.histogram[0].name, "gray");
        assert_eq!(report.histogram[0].counts.len(), 256);
        assert_eq!(report.clipping.marked, 2);
        assert_eq!(report.clipping.coverage, 0.5);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["path"], "/gray.png");
        assert!(json.get("metadata").is_none());
        assert!(json.get("grid").is_none());
    }

    #[test]
    fn diagnose_error_messages() {
        assert_eq!(
            DiagnoseError::Failed { failed: 1, total: 3 }.to_string(),
            "1 of 3 images could not be analyzed"
        );
        let err: DiagnoseError = ResourceError::Empty.into();
        assert_eq!(err.to_string(), "grid has no coordinates");
    }

    #[test]
    fn channel_names() {
        assert_eq!(channel_name(1, 0), "gray");
        assert_eq!(channel_name(3, 0), "red");
        assert_eq!(channel_name(3, 1), "green");
        assert_eq!(channel_name(3, 2), "blue");
    }
}
