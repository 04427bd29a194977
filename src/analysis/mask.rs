//! Per-pixel overlay masks.
//!
//! A [`Mask`] has the same spatial shape as the analysed image. Each cell is
//! either [`MaskCell::Marked`] (the overlay condition holds there) or
//! [`MaskCell::Unset`] (render nothing). A compositor draws marked cells in
//! its highlight colour and treats unset cells as fully transparent.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MaskCell {
    #[default]
    Unset,
    Marked,
}

impl MaskCell {
    pub fn is_marked(self) -> bool {
        self == MaskCell::Marked
    }
}

impl From<bool> for MaskCell {
    fn from(marked: bool) -> Self {
        if marked {
            MaskCell::Marked
        } else {
            MaskCell::Unset
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    cells: Vec<MaskCell>,
}

impl Mask {
    /// Build a mask by evaluating `predicate` on every row-major cell index.
    pub(crate) fn from_fn(width: u32, height: u32, predicate: impl Fn(usize) -> bool) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: (0..len).map(|i| MaskCell::from(predicate(i))).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells(&self) -> &[MaskCell] {
        &self.cells
    }

    /// Cell at `(x, y)`, or `None` outside the mask.
    pub fn get(&self, x: u32, y: u32) -> Option<MaskCell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y as usize * self.width as usize + x as usize])
    }

    pub fn is_marked(&self, x: u32, y: u32) -> bool {
        self.get(x, y).is_some_and(MaskCell::is_marked)
    }

    pub fn marked_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_marked()).count()
    }

    /// Fraction of cells marked, in `[0, 1]`. Zero for an empty mask.
    pub fn coverage(&self) -> f64 {
        if self.cells.is_empty() {
            0.0
        } else {
            self.marked_count() as f64 / self.cells.len() as f64
        }
    }

    /// `(x, y)` of every marked cell, row by row.
    pub fn marked_points(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_marked())
            .map(move |(i, _)| ((i % width) as u32, (i / width) as u32))
    }
}
