//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style cell references
//! (e.g., "A1", "B2", "Z100") and zero-indexed row/column coordinates.
//! Columns are a single letter, so at most [`MAX_COLS`] columns are addressable.
//!
//! # Examples
//!
//! ```
//! use cellcalc_engine::engine::CellRef;
//!
//! let cell = CellRef::parse("B3").unwrap();
//! assert_eq!(cell.col, 1); // 0-indexed
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Number of addressable columns (`A` through `Z`).
pub const MAX_COLS: usize = 26;

/// A reference to a cell by row and column indices (0-indexed).
///
/// Ordering is row-major, which is also the enumeration order of ranges.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell reference from spreadsheet notation (e.g., "A1", "c12").
    /// Returns None if the input is invalid.
    pub fn parse(name: &str) -> Option<CellRef> {
        let caps = a1_re().captures(name)?;
        let letter = caps["letter"].as_bytes()[0].to_ascii_uppercase();
        let col = (letter - b'A') as usize;
        let row = caps["numbers"].parse::<usize>().ok()?.checked_sub(1)?;
        Some(CellRef::new(row, col))
    }

    /// Convert a column index to its letter (0 -> A, 25 -> Z).
    /// Returns None for columns outside the single-letter range.
    pub fn col_to_letter(col: usize) -> Option<char> {
        if col < MAX_COLS {
            Some((b'A' + col as u8) as char)
        } else {
            None
        }
    }
}

fn a1_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<letter>[A-Za-z])(?<numbers>[0-9]+)$")
            .expect("cell reference regex must compile")
    })
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.trim()).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match CellRef::col_to_letter(self.col) {
            Some(letter) => write!(f, "{}{}", letter, self.row + 1),
            None => write!(f, "R{}C{}", self.row + 1, self.col + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CellRef;

    #[test]
    fn test_parse_huge_row_returns_none() {
        let huge = format!("A{}", "9".repeat(40));
        assert!(CellRef::parse(&huge).is_none());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let cell = CellRef::new(41, 25);
        assert_eq!(cell.to_string(), "Z42");
        assert_eq!(CellRef::parse("Z42"), Some(cell));
    }

    #[test]
    fn test_from_str_reports_bad_input() {
        let err = "A".parse::<CellRef>().unwrap_err();
        assert_eq!(err, "Invalid cell reference: A");
    }

    #[test]
    fn test_ordering_is_row_major() {
        assert!(CellRef::new(0, 25) < CellRef::new(1, 0));
        assert!(CellRef::new(2, 1) < CellRef::new(2, 3));
    }
}
