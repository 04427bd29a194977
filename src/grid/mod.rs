//! Composition grid overlays (rule of thirds, golden section, diagonals).
//!
//! - **Catalog**: resolves a grid name to normalized coordinates, from a
//!   caller-supplied directory or the built-in presets
//! - **Lines**: validates normalized rows and scales them to pixel space

pub mod catalog;
pub mod lines;

pub use catalog::{GridCatalog, PRESET_NAMES, ResourceError, parse_grid_csv, preset};
pub use lines::{GridLines, NormalizedGrid, scale_grid};
