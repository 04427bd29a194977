//! Analysis configuration.
//!
//! Handles loading, validating, and merging a `photodiag.toml` file. Every
//! key is optional: user values are layered over the stock defaults, so a
//! config file only needs the settings it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [clipping]
//! threshold = 250           # channel value at which a pixel counts as clipped
//!
//! [focus]
//! radius = 1                # local blur radius (kernel = 4 * radius + 1 pixels)
//! amount = 500.0            # gain on the local deviation
//! threshold = 6000.0        # minimum amplified deviation for "in focus"
//!
//! [grid]
//! enabled = true            # set to false to skip the grid overlay
//! preset = "thirds"         # built-in preset or <directory>/<name>.csv
//! # directory = "grids"     # where user grid CSV files live
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Focus parameters scale with resolution: the defaults suit 12–24 MP camera
//! files. Unknown keys are rejected to catch typos early.

use crate::analysis::{DEFAULT_CLIP_THRESHOLD, FocusParams};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Analysis configuration loaded from `photodiag.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagConfig {
    /// Highlight clipping settings.
    pub clipping: ClippingConfig,
    /// Focus peaking parameters.
    pub focus: FocusParams,
    /// Composition grid overlay.
    pub grid: GridConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl DiagConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.focus.amount.is_finite() {
            return Err(ConfigError::Validation(
                "focus.amount must be a finite number".into(),
            ));
        }
        if !self.focus.threshold.is_finite() {
            return Err(ConfigError::Validation(
                "focus.threshold must be a finite number".into(),
            ));
        }
        if self.grid.preset.trim().is_empty() {
            return Err(ConfigError::Validation(
                "grid.preset must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Highlight clipping settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClippingConfig {
    /// Pixels whose brightest channel is at or above this value are clipped.
    pub threshold: u8,
}

impl Default for ClippingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CLIP_THRESHOLD,
        }
    }
}

/// Composition grid settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Whether to compute a grid overlay at all.
    pub enabled: bool,
    /// Grid name: a built-in preset or a CSV file in `directory`.
    pub preset: String,
    /// Directory holding user grid CSV files.
    pub directory: Option<PathBuf>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            preset: "thirds".to_string(),
            directory: None,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel analysis workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(DiagConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<DiagConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: DiagConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load a config file, layered over the stock defaults.
///
/// A relative `grid.directory` is resolved against the config file's own
/// directory, so a config and its grids can travel together.
pub fn load_config(path: &Path) -> Result<DiagConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    let mut config = resolve_config(Some(overlay))?;
    if let (Some(dir), Some(base)) = (config.grid.directory.as_mut(), path.parent()) {
        if dir.is_relative() {
            *dir = base.join(&*dir);
        }
    }
    Ok(config)
}

/// Returns a fully-commented stock `photodiag.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# photodiag configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Highlight clipping
# ---------------------------------------------------------------------------
[clipping]
# A pixel is flagged when its brightest channel reaches this value (0-255).
threshold = 250

# ---------------------------------------------------------------------------
# Focus peaking
# ---------------------------------------------------------------------------
# These depend on image resolution. The defaults suit typical 12-24 MP
# camera files; raise the threshold for very detailed images, lower it for
# small web-sized ones.
[focus]
# Radius of the local blur. The kernel spans 4 * radius + 1 pixels.
radius = 1

# Gain applied to the local deviation of the high-passed image.
amount = 500.0

# Minimum amplified deviation for a pixel to be marked as in focus.
threshold = 6000.0

# ---------------------------------------------------------------------------
# Composition grid
# ---------------------------------------------------------------------------
[grid]
# Set to false to skip the grid overlay.
enabled = true

# Built-in presets: "thirds", "golden", "diagonals".
# Any other name is looked up as <directory>/<name>.csv.
preset = "thirds"

# Directory holding user grid files (comma-separated, rows of x,y pairs in
# [0, 1]). Relative paths are resolved against this config file.
# directory = "grids"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel analysis workers when several images are given.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
