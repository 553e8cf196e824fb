use std::collections::{BTreeSet, HashSet};

use cellcalc_engine::engine::{
    Cell, CellError, CellRef, CellValue, DepError, Entry, FORMULA_MARKER, ParsedFormula,
    parse_formula, resolve_parsed,
};

use super::Sheet;
use super::recalc::{RecalcReport, RecalcStep, plan_recalc};
use crate::error::{CalcError, Result};

impl Sheet {
    /// Read a cell. Fails with `OutOfBounds` outside the grid.
    pub fn get_cell(&self, row: usize, col: usize) -> Result<&Cell> {
        Ok(self.grid.get_cell(row, col)?)
    }

    /// Display text of a cell: the formatted value or its error marker.
    pub fn display(&self, row: usize, col: usize) -> Result<String> {
        Ok(self.get_cell(row, col)?.value.to_string())
    }

    /// Cells whose formulas read `source`.
    pub fn dependents_of(&self, source: CellRef) -> BTreeSet<CellRef> {
        self.graph.dependents_of(source)
    }

    /// Cells read by `dependent`'s formula.
    pub fn precedents_of(&self, dependent: CellRef) -> BTreeSet<CellRef> {
        self.graph.precedents_of(dependent)
    }

    /// Enter a literal or formula into a cell and propagate the change.
    ///
    /// Text starting with `=` is a formula; anything else is stored as a
    /// literal (see [`Entry::from_input`]). Blank text clears the cell.
    /// Formula mistakes never fail this call: they leave an error marker
    /// in the affected cells. Only an address outside the grid is an error,
    /// and in that case nothing is modified.
    pub fn submit_entry(&mut self, row: usize, col: usize, text: &str) -> Result<RecalcReport> {
        let previous = self.grid.get_cell(row, col)?.value.clone();
        let target = CellRef::new(row, col);

        // Edges of the old formula must not outlive it.
        self.graph.remove_all_edges_from(target);
        self.self_referencing.remove(&target);

        match Entry::from_input(text) {
            Entry::Formula(body) => {
                let parsed = parse_formula(&body);
                if parsed.has_malformed_range() {
                    tracing::debug!(cell = %target, formula = %body, "malformed range argument");
                }
                self.record_edges(target, &parsed);
                // Keep the old value until the pass evaluates the new formula.
                let formula = format!("{}{}", FORMULA_MARKER, body);
                self.grid.set_cell(row, col, previous, formula)?;
            }
            literal => {
                let value = literal.literal_value().unwrap_or_default();
                self.grid.set_cell(row, col, value, "")?;
            }
        }

        tracing::debug!(cell = %target, input = text, "entry submitted");
        Ok(self.propagate(BTreeSet::from([target])))
    }

    /// Like [`Sheet::submit_entry`], addressed in A1 notation.
    pub fn submit_entry_at(&mut self, address: &str, text: &str) -> Result<RecalcReport> {
        let cell_ref = CellRef::parse(address.trim())
            .ok_or_else(|| CalcError::InvalidAddress(address.to_string()))?;
        self.submit_entry(cell_ref.row, cell_ref.col, text)
    }

    /// Clear a cell's value and formula, then propagate.
    pub fn clear_cell(&mut self, row: usize, col: usize) -> Result<RecalcReport> {
        self.submit_entry(row, col, "")
    }

    /// Rebuild every dependency edge and re-evaluate every formula cell.
    pub fn recalculate_all(&mut self) -> RecalcReport {
        self.graph.clear();
        self.self_referencing.clear();

        let formulas: Vec<(CellRef, ParsedFormula)> = self
            .grid
            .formula_cells()
            .filter_map(|(cell_ref, cell)| {
                cell.formula_body().map(|body| (cell_ref, parse_formula(body)))
            })
            .collect();

        let mut roots = BTreeSet::new();
        for (cell_ref, parsed) in &formulas {
            self.record_edges(*cell_ref, parsed);
            roots.insert(*cell_ref);
        }
        self.propagate(roots)
    }

    /// Record one edge per cell the formula reads. A reference to the cell
    /// itself is not an edge; the cell is remembered as self-referencing.
    fn record_edges(&mut self, target: CellRef, parsed: &ParsedFormula) {
        for source in parsed.references(&self.grid) {
            if let Err(DepError::SelfReference(cell)) = self.graph.add_edge(source, target) {
                self.self_referencing.insert(cell);
            }
        }
    }

    /// Run one propagation pass from `roots` through all their dependents.
    fn propagate(&mut self, roots: BTreeSet<CellRef>) -> RecalcReport {
        let plan = plan_recalc(&self.graph, &roots);
        let options = self.config.resolve_options();
        let mut report = RecalcReport::default();
        let mut visited: HashSet<CellRef> = HashSet::with_capacity(plan.steps.len());

        for step in &plan.steps {
            let cell_ref = step.cell();
            if !visited.insert(cell_ref) {
                // A plan never lists a cell twice; if it did, the cell would be
                // revisited within one pass, which is itself a cycle.
                self.flag_cycle(cell_ref, &mut report);
                continue;
            }

            match step {
                RecalcStep::MarkCycle(_) => self.flag_cycle(cell_ref, &mut report),
                RecalcStep::Evaluate(_) => {
                    let Some(body) = self
                        .grid
                        .get(&cell_ref)
                        .and_then(|cell| cell.formula_body())
                        .map(str::to_string)
                    else {
                        // A literal root was written by the caller already.
                        report.updated.push(cell_ref);
                        continue;
                    };

                    if self.self_referencing.contains(&cell_ref) {
                        self.flag_cycle(cell_ref, &mut report);
                        continue;
                    }

                    let parsed = parse_formula(&body);
                    let resolution =
                        resolve_parsed(&parsed, &self.grid, &*self.evaluator, &options);
                    tracing::trace!(
                        cell = %cell_ref,
                        expression = resolution.expression.as_deref().unwrap_or(""),
                        value = %resolution.value,
                        "evaluated"
                    );
                    self.write_value(cell_ref, resolution.value, &mut report);
                }
            }
        }

        if report.had_cycles() {
            let cells: Vec<String> = report.cycles.iter().map(|c| c.to_string()).collect();
            tracing::warn!(cells = %cells.join(","), "circular reference");
        }
        tracing::debug!(
            updated = report.updated.len(),
            cycles = report.cycles.len(),
            "propagation pass complete"
        );
        report
    }

    fn flag_cycle(&mut self, cell_ref: CellRef, report: &mut RecalcReport) {
        report.cycles.push(cell_ref);
        self.write_value(cell_ref, CellValue::Error(CellError::Cycle), report);
    }

    fn write_value(&mut self, cell_ref: CellRef, value: CellValue, report: &mut RecalcReport) {
        // Cells in a plan come from the graph, which only holds in-grid cells.
        if self.grid.set_value(&cell_ref, value).is_ok() {
            report.updated.push(cell_ref);
        }
    }
}
