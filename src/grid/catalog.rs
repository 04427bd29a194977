//! Grid resource resolution.
//!
//! A [`GridCatalog`] turns a grid name into a [`NormalizedGrid`]. Names are
//! resolved against an explicit directory handed in by the caller, never the
//! process working directory:
//!
//! ```text
//! grids/
//! ├── thirds.csv      # overrides the built-in "thirds"
//! └── triangles.csv   # user-defined
//! ```
//!
//! `load("triangles")` reads `grids/triangles.csv`. When no file exists the
//! catalog falls back to the built-in presets ([`PRESET_NAMES`]).
//!
//! Files are plain comma-separated text, one line per row, no header. Blank
//! lines and lines starting with `#` are skipped.

use super::lines::NormalizedGrid;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("grid not found: {0}")]
    NotFound(PathBuf),
    #[error("invalid grid name '{0}': must be a relative path inside the grid directory")]
    InvalidName(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: '{value}' is not a number")]
    NonNumeric { line: usize, value: String },
    #[error("line {line}: {count} values do not form x,y pairs")]
    OddColumns { line: usize, count: usize },
    #[error("line {line}: expected {expected} values, found {found}")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("grid has no coordinates")]
    Empty,
}

/// Built-in grids available without any files on disk.
pub const PRESET_NAMES: &[&str] = &["thirds", "golden", "diagonals"];

/// Rows for a built-in grid, or `None` for an unknown name.
pub fn preset(name: &str) -> Option<NormalizedGrid> {
    let rows = match name {
        "thirds" => cross_lines(1.0 / 3.0),
        "golden" => {
            // 1 / φ²: the shorter golden section
            let phi = (1.0 + 5f64.sqrt()) / 2.0;
            cross_lines(1.0 / (phi * phi))
        }
        "diagonals" => vec![vec![0.0, 0.0, 1.0, 1.0], vec![0.0, 1.0, 1.0, 0.0]],
        _ => return None,
    };
    NormalizedGrid::new(rows).ok()
}

/// Two vertical and two horizontal full-frame lines at `t` and `1 - t`.
fn cross_lines(t: f64) -> Vec<Vec<f64>> {
    let u = 1.0 - t;
    vec![
        vec![t, 0.0, t, 1.0],
        vec![u, 0.0, u, 1.0],
        vec![0.0, t, 1.0, t],
        vec![0.0, u, 1.0, u],
    ]
}

/// Parse comma-separated grid text.
pub fn parse_grid_csv(text: &str) -> Result<NormalizedGrid, ResourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    let mut lines = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(rows.len() + 1, |p| p.line() as usize);
        let row = record
            .iter()
            .map(|field| {
                field
                    .parse::<f64>()
                    .map_err(|_| ResourceError::NonNumeric {
                        line,
                        value: field.to_string(),
                    })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        rows.push(row);
        lines.push(line);
    }
    NormalizedGrid::with_lines(rows, lines)
}

/// Resolves grid names to coordinates.
#[derive(Debug, Clone, Default)]
pub struct GridCatalog {
    root: Option<PathBuf>,
}

impl GridCatalog {
    /// Catalog reading `<root>/<name>.csv`, falling back to presets.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Catalog with only the built-in presets.
    pub fn builtin() -> Self {
        Self { root: None }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// File a name maps to under the grid directory (`.csv` added when missing).
    pub fn resolve(&self, name: &str) -> Result<Option<PathBuf>, ResourceError> {
        let rel = Path::new(name);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if name.is_empty() || escapes {
            return Err(ResourceError::InvalidName(name.to_string()));
        }
        Ok(self.root.as_ref().map(|root| {
            let path = root.join(rel);
            if path.extension().is_some() {
                path
            } else {
                path.with_extension("csv")
            }
        }))
    }

    /// Load a grid by name. Files in the grid directory shadow presets.
    pub fn load(&self, name: &str) -> Result<NormalizedGrid, ResourceError> {
        let path = self.resolve(name)?;
        if let Some(path) = path.as_ref().filter(|p| p.is_file()) {
            let text = std::fs::read_to_string(path).map_err(|source| ResourceError::Io {
                path: path.clone(),
                source,
            })?;
            return parse_grid_csv(&text);
        }

        let stem = name.strip_suffix(".csv").unwrap_or(name);
        preset(stem).ok_or_else(|| ResourceError::NotFound(path.unwrap_or_else(|| name.into())))
    }

    /// Names of all loadable grids: presets plus `.csv` files in the directory.
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<String> = PRESET_NAMES.iter().map(|s| s.to_string()).collect();
        if let Some(entries) = self.root.as_ref().and_then(|r| std::fs::read_dir(r).ok()) {
            names.extend(entries.filter_map(Result::ok).filter_map(|entry| {
                let path = entry.path();
                let is_csv = path
                    .extension()
                    .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
                if !is_csv {
                    return None;
                }
                path.file_stem().and_then(|s| s.to_str()).map(String::from)
            }));
        }
        names.sort();
        names.dedup();
        names
    }
}
