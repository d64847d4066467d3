//! Dense distance matrix with explicit missing cells
//!
//! Cells are `Option<f64>`: `None` marks a distance the service could not
//! provide. Missing values are carried as data, never as a NaN sentinel.

use crate::core::error::{Error, Result};

/// A single matrix cell: a distance in meters, or missing
pub type Distance = Option<f64>;

/// Row-major matrix of optional distances
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<Distance>,
}

impl DistanceMatrix {
    /// Create a matrix where every cell is missing
    pub fn missing(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    /// Build a matrix from row vectors, which must all have the same length
    pub fn from_rows(rows: Vec<Vec<Distance>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
            return Err(Error::Configuration(format!(
                "matrix row {bad} has {} columns, expected {cols}",
                rows[bad].len()
            )));
        }

        let n = rows.len();
        Ok(Self {
            rows: n,
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Shape as `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Distance {
        assert!(row < self.rows && col < self.cols, "cell ({row}, {col}) out of bounds");
        self.cells[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: Distance) {
        assert!(row < self.rows && col < self.cols, "cell ({row}, {col}) out of bounds");
        self.cells[row * self.cols + col] = value;
    }

    /// Copy of one row
    pub fn row(&self, row: usize) -> Vec<Distance> {
        (0..self.cols).map(|c| self.get(row, c)).collect()
    }

    /// Copy of one column
    pub fn column(&self, col: usize) -> Vec<Distance> {
        (0..self.rows).map(|r| self.get(r, col)).collect()
    }

    /// Number of missing cells
    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::missing(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.set(c, r, self.get(r, c));
            }
        }
        out
    }

    /// Join matrices side by side, in order.
    ///
    /// All blocks must share a row count. An empty input yields a 0×0 matrix.
    pub fn hstack(blocks: Vec<DistanceMatrix>) -> Result<Self> {
        let rows = match blocks.first() {
            Some(first) => first.rows,
            None => return Ok(Self::missing(0, 0)),
        };
        if let Some(bad) = blocks.iter().find(|b| b.rows != rows) {
            return Err(Error::Configuration(format!(
                "cannot stack a block with {} rows next to blocks with {rows}",
                bad.rows
            )));
        }

        let cols = blocks.iter().map(|b| b.cols).sum();
        let mut out = Self::missing(rows, cols);
        let mut offset = 0;
        for block in &blocks {
            for r in 0..rows {
                for c in 0..block.cols {
                    out.set(r, offset + c, block.get(r, c));
                }
            }
            offset += block.cols;
        }
        Ok(out)
    }
}
