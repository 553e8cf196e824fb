//! Sheet state and logic (UI-agnostic).

mod ops;
mod recalc;
mod state;

pub use recalc::{RecalcPlan, RecalcReport, RecalcStep, plan_recalc};
pub use state::Sheet;
