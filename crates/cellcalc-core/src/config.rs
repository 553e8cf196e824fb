//! Engine configuration.

use cellcalc_engine::engine::{MAX_COLS, MAX_ROWS, ResolveOptions};
use serde::Deserialize;

use crate::error::{CalcError, Result};

pub const DEFAULT_ROWS: usize = 100;
pub const DEFAULT_COLS: usize = MAX_COLS;

/// Settings for a [`Sheet`](crate::Sheet).
///
/// Deserializable so front ends can read it from a config file; every field
/// is optional there and falls back to [`EngineConfig::default`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Number of rows in the grid (at most 65536).
    pub rows: usize,
    /// Number of columns in the grid (at most 26, `A`..`Z`).
    pub cols: usize,
    /// Treat a malformed range argument as an error instead of 0.
    pub strict_ranges: bool,
    /// Formulas reading an error cell become errors themselves.
    pub propagate_errors: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            strict_ranges: false,
            propagate_errors: true,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.rows > MAX_ROWS {
            return Err(CalcError::Config(format!(
                "rows must be between 1 and {}, got {}",
                MAX_ROWS, self.rows
            )));
        }
        if self.cols == 0 || self.cols > MAX_COLS {
            return Err(CalcError::Config(format!(
                "cols must be between 1 and {}, got {}",
                MAX_COLS, self.cols
            )));
        }
        Ok(())
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            strict_ranges: self.strict_ranges,
            propagate_errors: self.propagate_errors,
        }
    }
}
