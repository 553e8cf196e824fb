//! Fixed-size grid store.
//!
//! The grid is allocated fully populated with empty cells and never resized.
//! It is pure storage: writing a cell never triggers evaluation.

use thiserror::Error;

use super::cell::{Cell, CellValue};
use super::cell_ref::{CellRef, MAX_COLS};

/// Errors raised by grid access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid grid dimensions {rows}x{cols} (need 1..=65536 rows and 1..=26 columns)")]
    InvalidDimensions { rows: usize, cols: usize },
}

/// Largest number of rows a grid may have.
pub const MAX_ROWS: usize = 65_536;

/// A dense ROWS×COLS matrix of cells, stored row-major.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Result<Grid, GridError> {
        let invalid = GridError::InvalidDimensions { rows, cols };
        if rows == 0 || rows > MAX_ROWS || cols == 0 || cols > MAX_COLS {
            return Err(invalid);
        }
        let len = rows * cols;
        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| invalid)?;
        cells.resize(len, Cell::new_empty());
        Ok(Grid { rows, cols, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        cell_ref.row < self.rows && cell_ref.col < self.cols
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, GridError> {
        if row < self.rows && col < self.cols {
            Ok(row * self.cols + col)
        } else {
            Err(GridError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Read a cell. Fails with `OutOfBounds` outside the grid.
    pub fn get_cell(&self, row: usize, col: usize) -> Result<&Cell, GridError> {
        let idx = self.index(row, col)?;
        Ok(&self.cells[idx])
    }

    /// Lenient lookup used by formulas: cells outside the grid are absent.
    pub fn get(&self, cell_ref: &CellRef) -> Option<&Cell> {
        self.index(cell_ref.row, cell_ref.col)
            .ok()
            .map(|idx| &self.cells[idx])
    }

    /// Overwrite both fields of a cell in one step.
    pub fn set_cell(
        &mut self,
        row: usize,
        col: usize,
        value: CellValue,
        formula: impl Into<String>,
    ) -> Result<(), GridError> {
        let idx = self.index(row, col)?;
        self.cells[idx] = Cell {
            value,
            formula: formula.into(),
        };
        Ok(())
    }

    /// Replace only the display value, keeping the stored formula.
    pub fn set_value(&mut self, cell_ref: &CellRef, value: CellValue) -> Result<(), GridError> {
        let idx = self.index(cell_ref.row, cell_ref.col)?;
        self.cells[idx].value = value;
        Ok(())
    }

    /// Iterate all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellRef, &Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (CellRef::new(idx / cols, idx % cols), cell))
    }

    /// Iterate formula cells in row-major order.
    pub fn formula_cells(&self) -> impl Iterator<Item = (CellRef, &Cell)> + '_ {
        self.iter().filter(|(_, cell)| cell.is_formula())
    }

    /// Bounding box `(max_row, max_col)` of non-empty cells, if any.
    pub fn used_bounds(&self) -> Option<(usize, usize)> {
        self.iter()
            .filter(|(_, cell)| cell.is_formula() || !cell.value.is_empty())
            .fold(None, |acc, (r, _)| match acc {
                None => Some((r.row, r.col)),
                Some((row, col)) => Some((row.max(r.row), col.max(r.col))),
            })
    }
}
