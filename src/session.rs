//! Line-driven front end over a [`Sheet`].
//!
//! Each line is one unit of work: an entry (`<ADDR> <TEXT>`) is submitted and
//! fully propagated before the next line is read.

use anyhow::{Context, Result, bail};
use cellcalc_core::{RecalcReport, Sheet};
use cellcalc_engine::builtins::RANGE_BUILTINS;
use cellcalc_engine::engine::CellRef;
use std::io::{BufRead, Write};

use crate::render::write_markdown;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

pub(crate) struct Session {
    pub(crate) sheet: Sheet,
    /// Print the cells touched by each entry.
    pub(crate) echo_updates: bool,
}

impl Session {
    pub(crate) fn new(sheet: Sheet, echo_updates: bool) -> Self {
        Session {
            sheet,
            echo_updates,
        }
    }

    /// Execute one line of input.
    pub(crate) fn execute(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }

        if let Some(command) = line.strip_prefix(':') {
            let (name, arg) = split_first_word(command);
            match name {
                "q" | "quit" => return Ok(Flow::Quit),
                "print" | "p" => write_markdown(out, &self.sheet)?,
                "show" => {
                    let cell_ref = parse_address(arg)?;
                    let cell = self.sheet.get_cell(cell_ref.row, cell_ref.col)?;
                    let shown = cell.value.to_string();
                    let input = cell.to_input_string();
                    if input == shown {
                        writeln!(out, "{} = {}", cell_ref, shown)?;
                    } else {
                        writeln!(out, "{} = {}  ({})", cell_ref, shown, input)?;
                    }
                }
                "functions" => {
                    for builtin in RANGE_BUILTINS {
                        writeln!(out, "{:<8}{}", builtin.sheet_name, builtin.description)?;
                    }
                }
                "clear" => {
                    let cell_ref = parse_address(arg)?;
                    let report = self.sheet.clear_cell(cell_ref.row, cell_ref.col)?;
                    self.echo(&report, out)?;
                }
                other => bail!("Unknown command: :{}", other),
            }
            return Ok(Flow::Continue);
        }

        let (address, text) = split_first_word(line);
        let cell_ref = parse_address(address)?;
        let report = self.sheet.submit_entry(cell_ref.row, cell_ref.col, text)?;
        self.echo(&report, out)?;
        Ok(Flow::Continue)
    }

    /// Execute lines until input ends or `:quit`. Errors on a line are
    /// reported to stderr and do not stop the session.
    pub(crate) fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<()> {
        for line in input.lines() {
            let line = line.context("Failed to read input")?;
            match self.execute(&line, out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(err) => eprintln!("Error: {:#}", err),
            }
            out.flush()?;
        }
        Ok(())
    }

    fn echo(&self, report: &RecalcReport, out: &mut impl Write) -> Result<()> {
        if !self.echo_updates {
            return Ok(());
        }
        for cell_ref in &report.updated {
            let display = self.sheet.display(cell_ref.row, cell_ref.col)?;
            writeln!(out, "{} = {}", cell_ref, display)?;
        }
        Ok(())
    }
}

fn split_first_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (s, ""),
    }
}

fn parse_address(s: &str) -> Result<CellRef> {
    if s.is_empty() {
        bail!("Missing cell address");
    }
    s.parse::<CellRef>().map_err(anyhow::Error::msg)
}
