//! Spreadsheet engine API.
//!
//! This module provides the leaf components of the calculation engine:
//!
//! - [`Cell`], [`CellValue`], [`CellError`] - Data structures for cell storage
//! - [`Grid`] - Fixed-size grid store
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`DepGraph`] - Reverse dependency tracking between cells
//! - [`resolve`] - Substitute references and range functions, then evaluate
//! - [`Evaluator`], [`RhaiEvaluator`] - Arithmetic evaluation backend
//! - [`format_number`] - Format values for display

mod cell;
mod cell_ref;
mod deps;
mod eval;
mod format;
mod grid;
mod resolve;

pub use cell::{Cell, CellError, CellValue, Entry, FORMULA_MARKER};
pub use cell_ref::{CellRef, MAX_COLS};
pub use deps::{DepError, DepGraph};
pub use eval::{EvalError, Evaluator, RhaiEvaluator};
pub use format::{format_number, format_operand};
pub use grid::{Grid, GridError, MAX_ROWS};
pub use resolve::{
    ParsedFormula, RangeArg, Resolution, ResolveOptions, Token, parse_formula, resolve,
    resolve_parsed,
};
