//! Built-in range functions and their metadata.
//!
//! Conventions:
//! - Spreadsheet-facing names are ALL CAPS (`SUM`, `AVERAGE`, ...), matched
//!   case-insensitively in formulas.
//! - Each function takes exactly one `<col><row>:<col><row>` range and is
//!   replaced by its scalar result before the expression is evaluated.
//! - If you add a new range function, add a [`RangeFunction`] variant, a row
//!   in `RANGE_BUILTINS` and its kernel in [`RangeFunction::aggregate`].

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RangeFunction {
    Sum,
    Average,
    Min,
    Max,
    Count,
}

pub struct RangeBuiltin {
    pub sheet_name: &'static str,
    pub function: RangeFunction,
    pub description: &'static str,
}

pub const RANGE_BUILTINS: &[RangeBuiltin] = &[
    RangeBuiltin {
        sheet_name: "SUM",
        function: RangeFunction::Sum,
        description: "Sum of the values in a cell range",
    },
    RangeBuiltin {
        sheet_name: "AVERAGE",
        function: RangeFunction::Average,
        description: "Sum of a cell range divided by its cell count",
    },
    RangeBuiltin {
        sheet_name: "MIN",
        function: RangeFunction::Min,
        description: "Smallest value in a cell range",
    },
    RangeBuiltin {
        sheet_name: "MAX",
        function: RangeFunction::Max,
        description: "Largest value in a cell range",
    },
    RangeBuiltin {
        sheet_name: "COUNT",
        function: RangeFunction::Count,
        description: "Number of cells addressed by a range",
    },
];

impl RangeFunction {
    /// Look up a range function by its spreadsheet name (case-insensitive).
    pub fn from_name(name: &str) -> Option<RangeFunction> {
        RANGE_BUILTINS
            .iter()
            .find(|b| b.sheet_name.eq_ignore_ascii_case(name))
            .map(|b| b.function)
    }

    pub fn sheet_name(&self) -> &'static str {
        RANGE_BUILTINS
            .iter()
            .find(|b| b.function == *self)
            .map(|b| b.sheet_name)
            .unwrap_or("?")
    }

    /// Reduce the values of every addressed cell to a scalar.
    ///
    /// `values` holds the cells read from the grid (non-numeric cells already
    /// read as 0); `missing` counts addressed cells that fall outside the grid,
    /// each of which contributes a 0. An empty range yields 0.
    pub fn aggregate(&self, values: &[f64], missing: u128) -> f64 {
        let count = values.len() as u128 + missing;
        if count == 0 {
            return 0.0;
        }
        let padded = values.iter().copied().chain((missing > 0).then_some(0.0));
        match self {
            RangeFunction::Sum => values.iter().sum(),
            RangeFunction::Average => values.iter().sum::<f64>() / count as f64,
            RangeFunction::Min => padded.fold(f64::INFINITY, f64::min),
            RangeFunction::Max => padded.fold(f64::NEG_INFINITY, f64::max),
            RangeFunction::Count => count as f64,
        }
    }
}
