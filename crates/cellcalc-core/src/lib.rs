//! cellcalc-core - UI-agnostic sheet model and recalculation engine.

pub mod config;
pub mod error;
pub mod sheet;

pub use config::EngineConfig;
pub use error::{CalcError, Result};
pub use sheet::{RecalcPlan, RecalcReport, RecalcStep, Sheet, plan_recalc};

pub use cellcalc_engine::engine::{Cell, CellError, CellRef, CellValue};
