use std::collections::BTreeSet;
use std::fmt;

use cellcalc_engine::engine::{CellRef, DepGraph, Evaluator, Grid, RhaiEvaluator};

use crate::config::EngineConfig;
use crate::error::Result;

/// A spreadsheet: grid store, dependency graph and evaluator, owned together.
///
/// All mutation goes through [`Sheet::submit_entry`] and friends, so a caller
/// never observes the grid part-way through a propagation pass.
pub struct Sheet {
    /// Cell values and formulas.
    pub(crate) grid: Grid,
    /// Reverse dependency map: cell -> cells whose formulas read it.
    pub(crate) graph: DepGraph,
    /// Formula cells whose current formula reads the cell itself.
    /// These edges are rejected by the graph, so they are tracked here.
    pub(crate) self_referencing: BTreeSet<CellRef>,
    /// Arithmetic backend for substituted formulas.
    pub(crate) evaluator: Box<dyn Evaluator>,
    pub(crate) config: EngineConfig,
}

impl Sheet {
    /// Create an empty sheet with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(EngineConfig::default())
    }

    /// Create an empty sheet with the given configuration and the Rhai evaluator.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        Self::with_evaluator(config, Box::new(RhaiEvaluator::new()))
    }

    /// Create an empty sheet with a custom arithmetic backend.
    pub fn with_evaluator(config: EngineConfig, evaluator: Box<dyn Evaluator>) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.rows, config.cols)?;
        Ok(Sheet {
            grid,
            graph: DepGraph::new(),
            self_referencing: BTreeSet::new(),
            evaluator,
            config,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn graph(&self) -> &DepGraph {
        &self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl fmt::Debug for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sheet")
            .field("rows", &self.grid.rows())
            .field("cols", &self.grid.cols())
            .field("edges", &self.graph.edge_count())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalcError;

    #[test]
    fn test_new_uses_default_config() {
        let sheet = Sheet::new().unwrap();
        assert_eq!(*sheet.config(), EngineConfig::default());
        assert_eq!(sheet.grid().rows(), sheet.config().rows);
    }

    #[test]
    fn test_huge_row_count_is_an_error() {
        let config = EngineConfig {
            rows: usize::MAX / 64,
            ..EngineConfig::default()
        };
        assert!(matches!(Sheet::with_config(config), Err(CalcError::Config(_))));
    }
}
