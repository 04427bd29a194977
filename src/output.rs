//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Each image leads with its positional index and file name, followed by
//! indented context lines: source path, camera settings (when EXIF is
//! present), then one line per overlay.
//!
//! ```text
//! 001 dawn.jpg (6000x4000, RGB)
//!     Source: shoots/dawn.jpg
//!     Camera: FUJIFILM X-T5, 1/250 s, f/8, ISO 125, 23 mm
//!     Histogram
//!         red    mean 112.4  peak 98
//!         green  mean 118.0  peak 104
//!         blue   mean 97.3   peak 71
//!     Clipping: 1234 px (0.01%)
//!     Focus: 56789 px (0.24%)
//!     Grid: 4 lines
//! 002 broken.jpg
//!     Error: failed to decode broken.jpg: ...
//!
//! Analyzed 2 images, 1 failed
//! ```
//!
//! # Architecture
//!
//! `format_*` functions return `Vec<String>` and are pure; `print_*`
//! wrappers write them to stdout. [`format_json`] renders the same batch as
//! a JSON array of [`Report`]s for `--json`.

use crate::diagnose::{ImageDiagnosis, MaskReport, Report, channel_name};
use crate::imaging::LoadError;
use crate::metadata::{Metadata, TagValue};
use serde::Serialize;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn color_label(channels: usize) -> &'static str {
    if channels == 1 { "gray" } else { "RGB" }
}

/// `1234 px (0.01%)`
fn format_mask(report: MaskReport) -> String {
    format!("{} px ({:.2}%)", report.marked, report.coverage * 100.0)
}

/// Drop a trailing `.0` so apertures and focal lengths read naturally.
fn trim_float(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.1}", v)
    }
}

/// Render one camera-setting tag in photographer notation.
fn format_setting(name: &str, value: &TagValue) -> String {
    match (name, value.as_f64()) {
        ("ExposureTime", Some(t)) if t > 0.0 && t < 1.0 => {
            format!("1/{} s", (1.0 / t).round() as i64)
        }
        ("ExposureTime", Some(t)) => format!("{} s", trim_float(t)),
        ("FNumber", Some(f)) => format!("f/{}", trim_float(f)),
        ("PhotographicSensitivity", Some(iso)) => format!("ISO {}", iso as i64),
        ("FocalLength", Some(mm)) => format!("{} mm", trim_float(mm)),
        _ => value.to_string(),
    }
}

/// Camera summary line, or `None` when no summary tags are present.
///
/// Make and model are joined with a space; other settings are comma-separated.
pub fn format_camera(metadata: &Metadata) -> Option<String> {
    let summary = metadata.shooting_summary();
    if summary.is_empty() {
        return None;
    }
    let body: Vec<String> = summary
        .iter()
        .filter(|(name, _)| !matches!(*name, "Make" | "Model"))
        .map(|(name, value)| format_setting(name, value))
        .collect();
    let camera: Vec<String> = summary
        .iter()
        .filter(|(name, _)| matches!(*name, "Make" | "Model"))
        .map(|(_, value)| value.to_string())
        .collect();

    let mut parts = Vec::new();
    if !camera.is_empty() {
        parts.push(camera.join(" "));
    }
    parts.extend(body);
    Some(parts.join(", "))
}

// ============================================================================
// Per-image output
// ============================================================================

/// Format one diagnosed image.
pub fn format_image(index: usize, image: &ImageDiagnosis) -> Vec<String> {
    let ctx = indent(1);
    let mut lines = vec![
        format!(
            "{} {} ({}x{}, {})",
            format_index(index),
            file_label(&image.path),
            image.width,
            image.height,
            color_label(image.channels)
        ),
        format!("{}Source: {}", ctx, image.path.display()),
    ];

    if let Some(camera) = image.metadata.as_ref().and_then(format_camera) {
        lines.push(format!("{}Camera: {}", ctx, camera));
    }

    let hist = &image.diagnosis.histogram;
    lines.push(format!("{}Histogram", ctx));
    for c in 0..hist.channel_count() {
        let mean = hist
            .mean(c)
            .map_or_else(|| "-".to_string(), |m| format!("{:.1}", m));
        let peak = hist
            .peak(c)
            .map_or_else(|| "-".to_string(), |p| p.to_string());
        lines.push(format!(
            "{}{:<6} mean {:<6} peak {}",
            indent(2),
            channel_name(hist.channel_count(), c),
            mean,
            peak
        ));
    }

    lines.push(format!(
        "{}Clipping: {}",
        ctx,
        format_mask(MaskReport::from(&image.diagnosis.clipping))
    ));
    lines.push(format!(
        "{}Focus: {}",
        ctx,
        format_mask(MaskReport::from(&image.diagnosis.focus))
    ));
    if let Some(grid) = &image.diagnosis.grid {
        lines.push(format!("{}Grid: {} lines", ctx, grid.line_count()));
    }

    lines
}

/// Format a failed image: header plus the error.
pub fn format_failure(index: usize, path: &Path, error: &LoadError) -> Vec<String> {
    vec![
        format!("{} {}", format_index(index), file_label(path)),
        format!("{}Error: {}", indent(1), error),
    ]
}

// ============================================================================
// Batch output
// ============================================================================

/// Format every result of a batch, followed by a one-line tally.
pub fn format_batch(
    paths: &[impl AsRef<Path>],
    results: &[Result<ImageDiagnosis, LoadError>],
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut failed = 0;

    for (i, (path, result)) in paths.iter().zip(results).enumerate() {
        match result {
            Ok(image) => lines.extend(format_image(i + 1, image)),
            Err(e) => {
                failed += 1;
                lines.extend(format_failure(i + 1, path.as_ref(), e));
            }
        }
    }

    lines.push(String::new());
    let noun = if results.len() == 1 { "image" } else { "images" };
    if failed == 0 {
        lines.push(format!("Analyzed {} {}", results.len(), noun));
    } else {
        lines.push(format!(
            "Analyzed {} {}, {} failed",
            results.len(),
            noun,
            failed
        ));
    }
    lines
}

/// Print batch output to stdout.
pub fn print_batch(paths: &[impl AsRef<Path>], results: &[Result<ImageDiagnosis, LoadError>]) {
    for line in format_batch(paths, results) {
        println!("{}", line);
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonEntry {
    Report(Box<Report>),
    Failure { path: String, error: String },
}

/// Pretty-printed JSON array, one entry per input path in order.
///
/// Failed images appear as `{"path": ..., "error": ...}`.
pub fn format_json(
    paths: &[impl AsRef<Path>],
    results: &[Result<ImageDiagnosis, LoadError>],
) -> Result<String, serde_json::Error> {
    let entries: Vec<JsonEntry> = paths
        .iter()
        .zip(results)
        .map(|(path, result)| match result {
            Ok(image) => JsonEntry::Report(Box::new(Report::from(image))),
            Err(e) => JsonEntry::Failure {
                path: path.as_ref().display().to_string(),
                error: e.to_string(),
            },
        })
        .collect();
    serde_json::to_string_pretty(&entries)
}

/// Format the list of loadable grid names, marking built-in presets.
pub fn format_grid_names(names: &[String], builtin: &[&str]) -> Vec<String> {
    names
        .iter()
        .map(|name| {
            if builtin.contains(&name.as_str()) {
                format!("{} (built-in)", name)
            } else {
                name.clone()
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
