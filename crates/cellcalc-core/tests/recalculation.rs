//! End-to-end behaviour of entry submission and propagation.

use cellcalc_core::{CellError, CellRef, CellValue, EngineConfig, Sheet};
use pretty_assertions::assert_eq;

fn cell(name: &str) -> CellRef {
    CellRef::parse(name).unwrap()
}

fn value(sheet: &Sheet, name: &str) -> CellValue {
    let r = cell(name);
    sheet.get_cell(r.row, r.col).unwrap().value.clone()
}

#[test]
fn literal_entries_round_trip() {
    let mut sheet = Sheet::new().unwrap();
    for (col, text) in ["5", "-2.5", "total", "0"].iter().enumerate() {
        sheet.submit_entry(3, col, text).unwrap();
        assert_eq!(sheet.display(3, col).unwrap(), *text);
        assert_eq!(sheet.get_cell(3, col).unwrap().formula, "");
    }
}

#[test]
fn simple_cell_arithmetic() {
    let mut sheet = Sheet::new().unwrap();
    sheet.submit_entry(0, 0, "5").unwrap();
    sheet.submit_entry(0, 1, "3").unwrap();
    sheet.submit_entry(0, 2, "=A1+B1").unwrap();
    assert_eq!(sheet.get_cell(0, 2).unwrap().value, CellValue::Number(8.0));
}

#[test]
fn range_aggregates() {
    let mut sheet = Sheet::new().unwrap();
    sheet.submit_entry_at("A1", "1").unwrap();
    sheet.submit_entry_at("A2", "2").unwrap();
    sheet.submit_entry_at("A3", "3").unwrap();

    for (formula, expected) in [
        ("=SUM(A1:A3)", 6.0),
        ("=AVERAGE(A1:A3)", 2.0),
        ("=MIN(A1:A3)", 1.0),
        ("=MAX(A1:A3)", 3.0),
        ("=COUNT(A1:A3)", 3.0),
    ] {
        sheet.submit_entry(0, 3, formula).unwrap();
        assert_eq!(value(&sheet, "D1"), CellValue::Number(expected), "{formula}");
    }
}

#[test]
fn range_functions_track_their_cells() {
    let mut sheet = Sheet::new().unwrap();
    sheet.submit_entry_at("A1", "1").unwrap();
    sheet.submit_entry_at("A2", "2").unwrap();
    sheet.submit_entry_at("B1", "=SUM(A1:A2)").unwrap();
    sheet.submit_entry_at("A2", "10").unwrap();
    assert_eq!(value(&sheet, "B1"), CellValue::Number(11.0));
}

#[test]
fn transitive_propagation() {
    let mut sheet = Sheet::new().unwrap();
    sheet.submit_entry_at("A1", "2").unwrap();
    sheet.submit_entry_at("B1", "=A1*2").unwrap();
    sheet.submit_entry_at("C1", "=B1+1").unwrap();
    assert_eq!(value(&sheet, "B1"), CellValue::Number(4.0));
    assert_eq!(value(&sheet, "C1"), CellValue::Number(5.0));

    let report = sheet.submit_entry_at("A1", "10").unwrap();
    assert_eq!(value(&sheet, "B1"), CellValue::Number(20.0));
    assert_eq!(value(&sheet, "C1"), CellValue::Number(21.0));
    assert_eq!(report.updated, vec![cell("A1"), cell("B1"), cell("C1")]);
}

#[test]
fn resubmitting_a_formula_is_idempotent() {
    let mut sheet = Sheet::new().unwrap();
    sheet.submit_entry_at("A1", "4").unwrap();
    sheet.submit_entry_at("B1", "=A1+A1*2").unwrap();
    let before = value(&sheet, "B1");
    let dependents = sheet.dependents_of(cell("A1")).len();
    let edges = sheet.graph().edge_count();

    sheet.submit_entry_at("B1", "=A1+A1*2").unwrap();
    assert_eq!(value(&sheet, "B1"), before);
    assert_eq!(sheet.dependents_of(cell("A1")).len(), dependents);
    assert_eq!(sheet.graph().edge_count(), edges);
}

#[test]
fn two_cell_cycle_terminates_with_markers() {
    let mut sheet = Sheet::new().unwrap();
    sheet.submit_entry_at("A1", "=B1+1").unwrap();
    let report = sheet.submit_entry_at("B1", "=A1+1").unwrap();

    assert_eq!(value(&sheet, "A1"), CellValue::Error(CellError::Cycle));
    assert_eq!(value(&sheet, "B1"), CellValue::Error(CellError::Cycle));
    assert_eq!(report.cycles, vec![cell("A1"), cell("B1")]);
    assert_eq!(sheet.display(0, 0).unwrap(), "#CYCLE!");
    // Formulas are preserved for editing.
    assert_eq!(sheet.get_cell(0, 0).unwrap().formula, "=B1+1");
}

#[test]
fn breaking_a_cycle_recovers_its_cells() {
    let mut sheet = Sheet::new().unwrap();
    sheet.submit_entry_at("A1", "=B1+1").unwrap();
    sheet.submit_entry_at("B1", "=A1+1").unwrap();
    sheet.submit_entry_at("B1", "7").unwrap();
    assert_eq!(value(&sheet, "A1"), CellValue::Number(8.0));
}

#[test]
fn cells_downstream_of_a_cycle_still_recompute() {
    let mut sheet = Sheet::new().unwrap();
    sheet.submit_entry_at("C1", "=A1*2").unwrap();
    sheet.submit_entry_at("D1", "=5").unwrap();
    sheet.submit_entry_at("A1", "=B1+1").unwrap();
    let report = sheet.submit_entry_at("B1", "=A1+1").unwrap();

    assert!(report.updated.contains(&cell("C1")));
    assert_eq!(value(&sheet, "C1"), CellValue::Error(CellError::Eval));
    assert_eq!(value(&sheet, "D1"), CellValue::Number(5.0));
}

#[test]
fn stale_edges_are_pruned() {
    let mut sheet = Sheet::new().unwrap();
    sheet.submit_entry_at("B1", "1").unwrap();
    sheet.submit_entry_at("A1", "=B1*100").unwrap();
    assert_eq!(value(&sheet, "A1"), CellValue::Number(100.0));

    sheet.submit_entry_at("A1", "7").unwrap();
    assert!(sheet.dependents_of(cell("B1")).is_empty());

    let report = sheet.submit_entry_at("B1", "2").unwrap();
    assert!(!report.updated.contains(&cell("A1")));
    assert_eq!(value(&sheet, "A1"), CellValue::Number(7.0));
}

#[test]
fn rewriting_a_formula_replaces_its_edges() {
    let mut sheet = Sheet::new().unwrap();
    sheet.submit_entry_at("C1", "=A1+B1").unwrap();
    sheet.submit_entry_at("C1", "=B1*2").unwrap();
    assert!(sheet.dependents_of(cell("A1")).is_empty());
    assert_eq!(sheet.precedents_of(cell("C1")).len(), 1);

    let report = sheet.submit_entry_at("A1", "9").unwrap();
    assert_eq!(report.updated, vec![cell("A1")]);
}

#[test]
fn ranges_past_the_grid_edge_default_to_zero() {
    let config = EngineConfig {
        rows: 5,
        cols: 3,
        ..EngineConfig::default()
    };
    let mut sheet = Sheet::with_config(config).unwrap();
    sheet.submit_entry_at("C4", "3").unwrap();
    sheet.submit_entry_at("C5", "5").unwrap();
    sheet.submit_entry_at("A1", "=SUM(C4:D8)").unwrap();
    assert_eq!(value(&sheet, "A1"), CellValue::Number(8.0));
    sheet.submit_entry_at("A2", "=COUNT(C4:D8)").unwrap();
    assert_eq!(value(&sheet, "A2"), CellValue::Number(10.0));
}

#[test]
fn evaluation_failure_keeps_formula() {
    let mut sheet = Sheet::new().unwrap();
    sheet.submit_entry_at("A1", "0").unwrap();
    sheet.submit_entry_at("B1", "=10/A1").unwrap();
    assert_eq!(value(&sheet, "B1"), CellValue::Error(CellError::Eval));
    assert_eq!(sheet.get_cell(0, 1).unwrap().formula, "=10/A1");

    sheet.submit_entry_at("A1", "4").unwrap();
    assert_eq!(value(&sheet, "B1"), CellValue::Number(2.5));
}

#[test]
fn malformed_range_is_lenient() {
    let mut sheet = Sheet::new().unwrap();
    sheet.submit_entry_at("A1", "5").unwrap();
    sheet.submit_entry_at("B1", "=SUM(A1) + 2").unwrap();
    assert_eq!(value(&sheet, "B1"), CellValue::Number(2.0));
    assert!(sheet.dependents_of(cell("A1")).is_empty());
}

#[test]
fn text_cells_read_as_zero() {
    let mut sheet = Sheet::new().unwrap();
    sheet.submit_entry_at("A1", "apples").unwrap();
    sheet.submit_entry_at("A2", "3").unwrap();
    sheet.submit_entry_at("A3", "=A1+A2").unwrap();
    sheet.submit_entry_at("A4", "=AVERAGE(A1:A2)").unwrap();
    assert_eq!(value(&sheet, "A3"), CellValue::Number(3.0));
    assert_eq!(value(&sheet, "A4"), CellValue::Number(1.5));
}

#[test]
fn exponent_literals_match_literal_entries() {
    let mut sheet = Sheet::new().unwrap();
    sheet.submit_entry_at("A1", "1e3").unwrap();
    sheet.submit_entry_at("B1", "=1e3").unwrap();
    sheet.submit_entry_at("C1", "=2.5E2+1").unwrap();
    assert_eq!(value(&sheet, "A1"), CellValue::Number(1000.0));
    assert_eq!(value(&sheet, "B1"), CellValue::Number(1000.0));
    assert_eq!(value(&sheet, "C1"), CellValue::Number(251.0));
    assert!(sheet.dependents_of(cell("E3")).is_empty());
    assert!(sheet.dependents_of(cell("E2")).is_empty());
}
