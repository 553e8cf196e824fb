//! Dependency graph between cells.
//!
//! # Edge Direction
//!
//! ```text
//! A → B  means  "B's formula reads A"  (A is the source, B the dependent)
//! ```
//!
//! Both directions are stored so that "what must recompute when A changes?"
//! and "which edges does B's current formula own?" are direct lookups.
//! An edge exists only while the dependent's formula text references the source;
//! callers prune a dependent's edges with [`DepGraph::remove_all_edges_from`]
//! before recording the edges of a new formula.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use super::cell_ref::CellRef;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DepError {
    #[error("{0} refers to itself")]
    SelfReference(CellRef),
}

/// Reverse-lookup dependency graph.
///
/// Invariants:
/// 1. If A ∈ sources[B] then B ∈ dependents[A], and vice versa.
/// 2. Empty sets are removed, not stored.
/// 3. No cell is its own source.
#[derive(Default, Debug, Clone)]
pub struct DepGraph {
    /// For each referenced cell A, the cells whose formulas read it.
    dependents: BTreeMap<CellRef, BTreeSet<CellRef>>,
    /// For each formula cell B, the cells its formula reads.
    sources: BTreeMap<CellRef, BTreeSet<CellRef>>,
}

impl DepGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `dependent` reads `source`.
    ///
    /// Returns `Ok(true)` when the edge is new and `Ok(false)` when it already
    /// existed. A self edge is rejected and not recorded.
    pub fn add_edge(&mut self, source: CellRef, dependent: CellRef) -> Result<bool, DepError> {
        if source == dependent {
            return Err(DepError::SelfReference(source));
        }
        let inserted = self.dependents.entry(source).or_default().insert(dependent);
        self.sources.entry(dependent).or_default().insert(source);
        Ok(inserted)
    }

    /// Remove every edge whose dependent side is `dependent`.
    pub fn remove_all_edges_from(&mut self, dependent: CellRef) {
        let Some(old_sources) = self.sources.remove(&dependent) else {
            return;
        };
        for source in old_sources {
            if let Some(deps) = self.dependents.get_mut(&source) {
                deps.remove(&dependent);
                if deps.is_empty() {
                    self.dependents.remove(&source);
                }
            }
        }
    }

    /// Cells that must be notified when `source` changes.
    pub fn dependents_of(&self, source: CellRef) -> BTreeSet<CellRef> {
        self.dependents.get(&source).cloned().unwrap_or_default()
    }

    /// Borrowing variant of [`DepGraph::dependents_of`].
    pub fn dependents(&self, source: CellRef) -> impl Iterator<Item = CellRef> + '_ {
        self.dependents
            .get(&source)
            .into_iter()
            .flat_map(|s| s.iter().copied())
    }

    /// Cells that `dependent`'s formula reads.
    pub fn precedents_of(&self, dependent: CellRef) -> BTreeSet<CellRef> {
        self.sources.get(&dependent).cloned().unwrap_or_default()
    }

    pub fn precedents(&self, dependent: CellRef) -> impl Iterator<Item = CellRef> + '_ {
        self.sources
            .get(&dependent)
            .into_iter()
            .flat_map(|s| s.iter().copied())
    }

    /// Every cell reachable from `source` by following dependent edges.
    /// `source` itself is included only if it lies on a cycle.
    pub fn reachable_from(&self, source: CellRef) -> BTreeSet<CellRef> {
        let mut seen = BTreeSet::new();
        let mut stack: Vec<CellRef> = self.dependents(source).collect();
        while let Some(cell) = stack.pop() {
            if seen.insert(cell) {
                stack.extend(self.dependents(cell));
            }
        }
        seen
    }

    pub fn edge_count(&self) -> usize {
        self.sources.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn clear(&mut self) {
        self.dependents.clear();
        self.sources.clear();
    }
}
