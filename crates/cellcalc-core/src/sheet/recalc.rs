//! Propagation planning.
//!
//! One edit starts one propagation pass. The pass covers the edited cells and
//! everything reachable from them through dependent edges, visiting each cell
//! once:
//!
//! 1. Kahn's algorithm orders the acyclic part of the pass, sources first.
//! 2. Cells Kahn cannot release lie on a cycle or downstream of one. Those that
//!    can reach themselves are flagged as circular.
//! 3. The remaining downstream cells are ordered again and evaluated after the
//!    circular cells have been flagged, so they read the error markers.

use std::collections::{BTreeMap, BTreeSet};

use cellcalc_engine::engine::{CellRef, DepGraph};

/// One unit of work in a propagation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecalcStep {
    /// Re-evaluate the cell's formula (or accept its freshly written literal).
    Evaluate(CellRef),
    /// The cell lies on a cycle and receives the circular-reference marker.
    MarkCycle(CellRef),
}

impl RecalcStep {
    pub fn cell(&self) -> CellRef {
        match self {
            RecalcStep::Evaluate(cell) | RecalcStep::MarkCycle(cell) => *cell,
        }
    }
}

/// Ordered steps for one propagation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecalcPlan {
    pub steps: Vec<RecalcStep>,
}

impl RecalcPlan {
    pub fn cyclic(&self) -> impl Iterator<Item = CellRef> + '_ {
        self.steps.iter().filter_map(|step| match step {
            RecalcStep::MarkCycle(cell) => Some(*cell),
            RecalcStep::Evaluate(_) => None,
        })
    }
}

/// Cells touched by one propagation pass, returned to the caller so a UI can
/// refresh exactly what changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecalcReport {
    /// Every cell written during the pass, in write order.
    pub updated: Vec<CellRef>,
    /// Cells flagged as circular references.
    pub cycles: Vec<CellRef>,
}

impl RecalcReport {
    pub fn is_empty(&self) -> bool {
        self.updated.is_empty()
    }

    pub fn had_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }
}

/// Plan a propagation pass starting at `roots`.
pub fn plan_recalc(graph: &DepGraph, roots: &BTreeSet<CellRef>) -> RecalcPlan {
    let mut pass: BTreeSet<CellRef> = roots.clone();
    for root in roots {
        pass.extend(graph.reachable_from(*root));
    }

    let mut steps = Vec::with_capacity(pass.len());
    let ordered = topo_order(graph, &pass);
    let released: BTreeSet<CellRef> = ordered.iter().copied().collect();
    steps.extend(ordered.into_iter().map(RecalcStep::Evaluate));

    let leftover: BTreeSet<CellRef> = pass.difference(&released).copied().collect();
    if leftover.is_empty() {
        return RecalcPlan { steps };
    }

    let cyclic: BTreeSet<CellRef> = leftover
        .iter()
        .copied()
        .filter(|cell| reaches_itself(graph, *cell, &leftover))
        .collect();
    steps.extend(cyclic.iter().copied().map(RecalcStep::MarkCycle));

    let downstream: BTreeSet<CellRef> = leftover.difference(&cyclic).copied().collect();
    let ordered = topo_order(graph, &downstream);
    debug_assert_eq!(ordered.len(), downstream.len());
    steps.extend(ordered.into_iter().map(RecalcStep::Evaluate));

    RecalcPlan { steps }
}

/// Kahn's algorithm restricted to `cells`. Ready cells are released in
/// row-major order so plans are deterministic. Cells on or behind a cycle
/// are left out of the result.
fn topo_order(graph: &DepGraph, cells: &BTreeSet<CellRef>) -> Vec<CellRef> {
    let mut in_degree: BTreeMap<CellRef, usize> = cells
        .iter()
        .map(|&cell| {
            let count = graph.precedents(cell).filter(|p| cells.contains(p)).count();
            (cell, count)
        })
        .collect();

    let mut ready: BTreeSet<CellRef> = in_degree
        .iter()
        .filter(|(_, deg)| **deg == 0)
        .map(|(cell, _)| *cell)
        .collect();

    let mut order = Vec::with_capacity(cells.len());
    while let Some(cell) = ready.pop_first() {
        order.push(cell);
        for dep in graph.dependents(cell) {
            if let Some(deg) = in_degree.get_mut(&dep) {
                *deg = deg.saturating_sub(1);
                if *deg == 0 {
                    ready.insert(dep);
                }
            }
        }
    }
    order
}

/// Whether `start` can reach itself through dependent edges inside `within`.
fn reaches_itself(graph: &DepGraph, start: CellRef, within: &BTreeSet<CellRef>) -> bool {
    let mut visiting = BTreeSet::new();
    let mut stack: Vec<CellRef> = graph.dependents(start).filter(|c| within.contains(c)).collect();
    while let Some(cell) = stack.pop() {
        if cell == start {
            return true;
        }
        if visiting.insert(cell) {
            stack.extend(graph.dependents(cell).filter(|c| within.contains(c)));
        }
    }
    false
}
