//! Error types for cellcalc core.

use cellcalc_engine::engine::GridError;
use thiserror::Error;

/// Errors returned by sheet operations.
///
/// Mistakes inside formulas are not errors at this level: they are stored in
/// the cell as an error marker. Only contract violations surface here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CalcError>;
