//! Cell data structures for the spreadsheet grid.
//!
//! This module provides the core data types for representing cells:
//! - [`CellValue`] - The evaluated content of a cell (empty, number, text, or error marker)
//! - [`CellError`] - The error markers a formula cell can display
//! - [`Cell`] - A display value paired with the formula that produced it
//! - [`Entry`] - Classified user input, before it is written into the grid

use std::fmt;

use super::format::format_number;

/// Leading character that marks an entry as a formula.
pub const FORMULA_MARKER: char = '=';

/// Error markers shown in place of a value when a formula cannot produce one.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CellError {
    /// The evaluator rejected the substituted expression or produced a non-finite result.
    Eval,
    /// The cell sits on a circular reference.
    Cycle,
    /// A range function argument was malformed (strict ranges only).
    Range,
}

impl CellError {
    pub fn marker(&self) -> &'static str {
        match self {
            CellError::Eval => "#ERR!",
            CellError::Cycle => "#CYCLE!",
            CellError::Range => "#RANGE!",
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// The display value of a cell.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Error(CellError),
}

impl CellValue {
    /// Numeric view used by formulas. Empty and text cells have no number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Error(e) => e.fmt(f),
        }
    }
}

/// A cell in the spreadsheet grid.
///
/// `formula` is empty for literal cells; otherwise it holds the full entry
/// text including the leading `=`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Cell {
    pub value: CellValue,
    pub formula: String,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell::default()
    }

    pub fn new_literal(value: CellValue) -> Cell {
        Cell {
            value,
            formula: String::new(),
        }
    }

    pub fn is_formula(&self) -> bool {
        !self.formula.is_empty()
    }

    /// The formula text after the marker, if this is a formula cell.
    pub fn formula_body(&self) -> Option<&str> {
        self.formula.strip_prefix(FORMULA_MARKER)
    }

    /// Get the text a user would edit to reproduce this cell.
    pub fn to_input_string(&self) -> String {
        if self.is_formula() {
            return self.formula.clone();
        }
        match &self.value {
            CellValue::Text(s) if needs_quotes(s) => format!("\"{}\"", s),
            other => other.to_string(),
        }
    }
}

fn needs_quotes(text: &str) -> bool {
    text.trim() != text || text.starts_with(FORMULA_MARKER) || text.parse::<f64>().is_ok()
}

/// User input classified into the kind of cell it produces.
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    Empty,
    Number(f64),
    Text(String),
    /// Formula body, without the leading `=`.
    Formula(String),
}

impl Entry {
    /// Parse user input and classify it.
    /// - Empty string or whitespace -> Empty
    /// - Starts with '=' -> Formula (without the '=')
    /// - Quoted string -> Text (without quotes)
    /// - Valid number -> Number
    /// - Otherwise -> Text
    pub fn from_input(input: &str) -> Entry {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Entry::Empty;
        }

        if let Some(formula) = trimmed.strip_prefix(FORMULA_MARKER) {
            return Entry::Formula(formula.trim().to_string());
        }

        if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
            let text = &trimmed[1..trimmed.len() - 1];
            return Entry::Text(text.to_string());
        }

        if let Ok(n) = trimmed.parse::<f64>()
            && n.is_finite()
        {
            return Entry::Number(n);
        }

        Entry::Text(trimmed.to_string())
    }

    /// The literal value this entry stores, or None for formulas.
    pub fn literal_value(&self) -> Option<CellValue> {
        match self {
            Entry::Empty => Some(CellValue::Empty),
            Entry::Number(n) => Some(CellValue::Number(*n)),
            Entry::Text(s) => Some(CellValue::Text(s.clone())),
            Entry::Formula(_) => None,
        }
    }
}
