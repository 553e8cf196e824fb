//! cellcalc_engine - Spreadsheet engine + Rhai integration.

pub mod builtins;
pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;

    #[test]
    fn test_parse_single_letter_columns() {
        let a1 = CellRef::parse("A1").unwrap();
        assert_eq!(a1.row, 0);
        assert_eq!(a1.col, 0);

        let b1 = CellRef::parse("B1").unwrap();
        assert_eq!(b1.row, 0);
        assert_eq!(b1.col, 1);

        let z1 = CellRef::parse("Z1").unwrap();
        assert_eq!(z1.row, 0);
        assert_eq!(z1.col, 25);
    }

    #[test]
    fn test_parse_row_numbers() {
        assert_eq!(CellRef::parse("A1").unwrap().row, 0);
        assert_eq!(CellRef::parse("A10").unwrap().row, 9);
        assert_eq!(CellRef::parse("A100").unwrap().row, 99);
    }

    #[test]
    fn test_parse_case_insensitive() {
        let lower = CellRef::parse("c7").unwrap();
        assert_eq!(lower, CellRef::new(6, 2));
    }

    #[test]
    fn test_parse_invalid_inputs() {
        assert!(CellRef::parse("").is_none());
        assert!(CellRef::parse("123").is_none());
        assert!(CellRef::parse("ABC").is_none());
        assert!(CellRef::parse("A0").is_none());
        assert!(CellRef::parse("1A").is_none());
        assert!(CellRef::parse("A 1").is_none());
        // Multi-letter columns are outside the supported address space.
        assert!(CellRef::parse("AA1").is_none());
    }

    #[test]
    fn test_resolve_against_grid() {
        let mut grid = Grid::new(10, 5).unwrap();
        grid.set_cell(0, 0, CellValue::Number(5.0), "").unwrap();
        grid.set_cell(0, 1, CellValue::Number(3.0), "").unwrap();

        let evaluator = RhaiEvaluator::new();
        let resolution = resolve("A1+B1", &grid, &evaluator, &ResolveOptions::default());
        assert_eq!(resolution.value, CellValue::Number(8.0));
        assert_eq!(
            resolution.references.into_iter().collect::<Vec<_>>(),
            vec![CellRef::new(0, 0), CellRef::new(0, 1)]
        );
    }

    #[test]
    fn test_dependency_graph_round_trip() {
        let mut graph = DepGraph::new();
        let a1 = CellRef::new(0, 0);
        let b1 = CellRef::new(0, 1);
        graph.add_edge(a1, b1).unwrap();
        assert!(graph.dependents_of(a1).contains(&b1));
        graph.remove_all_edges_from(b1);
        assert!(graph.dependents_of(a1).is_empty());
    }
}
