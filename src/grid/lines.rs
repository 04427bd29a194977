//! Normalized grid coordinates and their pixel-space scaling.
//!
//! Grid data is a table of rows. Each row is one guide line (or polyline)
//! written as interleaved `x, y` pairs in `[0, 1]`, so even columns are x and
//! odd columns are y:
//!
//! ```text
//! x0,  y0,  x1,  y1
//! 0.5, 0.0, 0.5, 1.0     ← vertical centre line
//! ```
//!
//! Scaling to an image is a pure affine map (`x · W`, `y · H`) with no
//! clipping; values outside `[0, 1]` land outside the frame.

use super::catalog::ResourceError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGrid {
    rows: Vec<Vec<f64>>,
}

impl NormalizedGrid {
    /// Validate and wrap rows of interleaved coordinates.
    ///
    /// Rows must be non-empty, hold an even number of finite values, and all
    /// share the same width. Row numbers in errors are 1-based.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, ResourceError> {
        let lines = (1..=rows.len()).collect();
        Self::with_lines(rows, lines)
    }

    /// Like [`new`](Self::new), but errors report `lines[i]` for row `i`.
    pub(crate) fn with_lines(
        rows: Vec<Vec<f64>>,
        lines: Vec<usize>,
    ) -> Result<Self, ResourceError> {
        let first = rows.first().ok_or(ResourceError::Empty)?;
        let expected = first.len();
        for (row, &line) in rows.iter().zip(&lines) {
            if let Some(v) = row.iter().find(|v| !v.is_finite()) {
                return Err(ResourceError::NonNumeric {
                    line,
                    value: v.to_string(),
                });
            }
            if row.len() % 2 != 0 {
                return Err(ResourceError::OddColumns {
                    line,
                    count: row.len(),
                });
            }
            if row.len() != expected {
                return Err(ResourceError::Ragged {
                    line,
                    expected,
                    found: row.len(),
                });
            }
        }
        if expected == 0 {
            return Err(ResourceError::Empty);
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of `(x, y)` points per row.
    pub fn points_per_row(&self) -> usize {
        self.rows[0].len() / 2
    }
}

/// Grid coordinates in pixel space.
///
/// `x[r]` and `y[r]` hold the scaled even and odd columns of input row `r`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLines {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<Vec<f64>>,
}

impl GridLines {
    /// Each row as a list of `(x, y)` points, ready to draw as a polyline.
    pub fn polylines(&self) -> Vec<Vec<(f64, f64)>> {
        self.x
            .iter()
            .zip(&self.y)
            .map(|(xs, ys)| xs.iter().copied().zip(ys.iter().copied()).collect())
            .collect()
    }

    pub fn line_count(&self) -> usize {
        self.x.len()
    }

    /// Undo [`scale_grid`]: divide by the image size and re-interleave.
    pub fn normalize(&self, width: u32, height: u32) -> NormalizedGrid {
        let (w, h) = (f64::from(width), f64::from(height));
        let rows = self
            .x
            .iter()
            .zip(&self.y)
            .map(|(xs, ys)| {
                xs.iter()
                    .zip(ys)
                    .flat_map(|(x, y)| [x / w, y / h])
                    .collect()
            })
            .collect();
        NormalizedGrid { rows }
    }
}

/// Scale normalized grid rows to an image of `width × height` pixels.
pub fn scale_grid(grid: &NormalizedGrid, width: u32, height: u32) -> GridLines {
    let (w, h) = (f64::from(width), f64::from(height));
    let x = grid
        .rows
        .iter()
        .map(|row| row.iter().step_by(2).map(|v| v * w).collect())
        .collect();
    let y = grid
        .rows
        .iter()
        .map(|row| row.iter().skip(1).step_by(2).map(|v| v * h).collect())
        .collect();
    GridLines { x, y }
}
