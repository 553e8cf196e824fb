//! Markdown rendering of the grid.

use cellcalc_core::Sheet;
use cellcalc_engine::engine::CellRef;
use std::io::{self, Write};

/// Write the used part of the grid as a markdown table.
pub(crate) fn write_markdown(out: &mut impl Write, sheet: &Sheet) -> io::Result<()> {
    let grid = sheet.grid();
    let Some((max_row, max_col)) = grid.used_bounds() else {
        writeln!(out, "*Empty sheet*")?;
        return Ok(());
    };

    write!(out, "|   |")?;
    for col in 0..=max_col {
        let letter = CellRef::col_to_letter(col).unwrap_or('?');
        write!(out, " {} |", letter)?;
    }
    writeln!(out)?;

    write!(out, "|---|")?;
    for _ in 0..=max_col {
        write!(out, "---|")?;
    }
    writeln!(out)?;

    for row in 0..=max_row {
        write!(out, "| {} |", row + 1)?;
        for col in 0..=max_col {
            let display = grid
                .get(&CellRef::new(row, col))
                .map(|cell| cell.value.to_string())
                .unwrap_or_default();
            write!(out, " {} |", escape_markdown(&display))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|")
}
