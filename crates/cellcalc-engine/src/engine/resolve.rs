//! Reference resolution for formulas.
//!
//! A formula body (the text after `=`) is scanned once into [`Token`]s:
//! range-function calls such as `SUM(A1:B3)`, bare addresses such as `A1`,
//! numeric literals, and everything else as opaque text. Resolution then runs
//! two substitution passes against the grid's current values:
//!
//! 1. every range-function call becomes its aggregate,
//! 2. every bare address becomes the referenced cell's number,
//!
//! and hands the resulting purely numeric expression to an [`Evaluator`].
//! Each pass reads the grid on its own; nothing read by the first pass is
//! reused by the second.

use std::collections::BTreeSet;

use crate::builtins::RangeFunction;

use super::cell::{CellError, CellValue};
use super::cell_ref::CellRef;
use super::eval::Evaluator;
use super::format::format_operand;
use super::grid::Grid;

/// Argument of a range-function call.
#[derive(Clone, Debug, PartialEq)]
pub enum RangeArg {
    /// Two corner addresses; the range is the inclusive rectangle between them.
    Cells { start: CellRef, end: CellRef },
    /// Text that does not match `<col><row>:<col><row>`.
    Malformed(String),
}

impl RangeArg {
    fn parse(arg: &str) -> RangeArg {
        let mut parts = arg.split(':');
        if let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next())
            && let (Some(start), Some(end)) =
                (CellRef::parse(start.trim()), CellRef::parse(end.trim()))
        {
            return RangeArg::Cells { start, end };
        }
        RangeArg::Malformed(arg.to_string())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// Operators, whitespace and identifiers passed through unchanged.
    Text(String),
    /// A numeric literal, either written in the formula or substituted.
    Number(f64),
    /// A bare cell address.
    Ref(CellRef),
    /// A call of one of the recognised range functions.
    Range { function: RangeFunction, arg: RangeArg },
}

/// A scanned formula body.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ParsedFormula {
    tokens: Vec<Token>,
}

impl ParsedFormula {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Every in-grid cell the formula reads: bare addresses plus the cells of
    /// well-formed ranges. Addresses outside the grid are not dependencies.
    pub fn references(&self, grid: &Grid) -> BTreeSet<CellRef> {
        let mut refs = BTreeSet::new();
        for token in &self.tokens {
            match token {
                Token::Ref(cell_ref) if grid.contains(cell_ref) => {
                    refs.insert(*cell_ref);
                }
                Token::Range {
                    arg: RangeArg::Cells { start, end },
                    ..
                } => {
                    let (rows, cols) = clipped_bounds(start, end, grid);
                    for row in rows {
                        for col in cols.clone() {
                            refs.insert(CellRef::new(row, col));
                        }
                    }
                }
                _ => {}
            }
        }
        refs
    }

    pub fn has_malformed_range(&self) -> bool {
        self.tokens.iter().any(|t| {
            matches!(
                t,
                Token::Range {
                    arg: RangeArg::Malformed(_),
                    ..
                }
            )
        })
    }
}

/// Scan a formula body into tokens.
pub fn parse_formula(body: &str) -> ParsedFormula {
    let chars: Vec<char> = body.chars().collect();
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut i = 0;

    let flush = |text: &mut String, tokens: &mut Vec<Token>| {
        if !text.is_empty() {
            tokens.push(Token::Text(std::mem::take(text)));
        }
    };

    while i < chars.len() {
        let ch = chars[i];
        if ch.is_ascii_alphabetic() {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let ident: String = chars[start..i].iter().collect();

            if let Some(function) = RangeFunction::from_name(&ident)
                && let Some((arg, next)) = call_argument(&chars, i)
            {
                flush(&mut text, &mut tokens);
                tokens.push(Token::Range {
                    function,
                    arg: RangeArg::parse(arg.trim()),
                });
                i = next;
            } else if let Some(cell_ref) = CellRef::parse(&ident) {
                flush(&mut text, &mut tokens);
                tokens.push(Token::Ref(cell_ref));
            } else {
                text.push_str(&ident);
            }
        } else if ch.is_ascii_digit()
            || (ch == '.' && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit()))
        {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            if let Some(end) = exponent_end(&chars, i) {
                i = end;
            }
            let literal: String = chars[start..i].iter().collect();
            match literal.parse::<f64>() {
                Ok(n) => {
                    flush(&mut text, &mut tokens);
                    tokens.push(Token::Number(n));
                }
                Err(_) => text.push_str(&literal),
            }
        } else {
            text.push(ch);
            i += 1;
        }
    }
    flush(&mut text, &mut tokens);

    ParsedFormula { tokens }
}

/// End of an `e`/`E` exponent (`[eE][+-]?digits`) starting at `pos`, if one is
/// there. Without digits the letter is left for the identifier scanner.
fn exponent_end(chars: &[char], pos: usize) -> Option<usize> {
    if !matches!(chars.get(pos), Some('e' | 'E')) {
        return None;
    }
    let mut i = pos + 1;
    if matches!(chars.get(i), Some('+' | '-')) {
        i += 1;
    }
    let digits = chars[i..]
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .count();
    (digits > 0).then_some(i + digits)
}

/// If `chars[pos..]` starts (after optional spaces) with `(`, return the text
/// up to the next `)` and the index just past it. Nested parentheses are not
/// part of the range syntax.
fn call_argument(chars: &[char], pos: usize) -> Option<(String, usize)> {
    let mut i = pos;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    if chars.get(i) != Some(&'(') {
        return None;
    }
    let open = i + 1;
    let close = open + chars[open..].iter().position(|&c| c == ')')?;
    Some((chars[open..close].iter().collect(), close + 1))
}

/// Row and column spans of a range, clipped to the grid.
fn clipped_bounds(
    start: &CellRef,
    end: &CellRef,
    grid: &Grid,
) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
    let min_row = start.row.min(end.row);
    let max_row = start.row.max(end.row);
    let min_col = start.col.min(end.col);
    let max_col = start.col.max(end.col);
    let rows = min_row.min(grid.rows())..max_row.saturating_add(1).min(grid.rows());
    let cols = min_col.min(grid.cols())..max_col.saturating_add(1).min(grid.cols());
    (rows, cols)
}

/// Knobs for the lenient corners of resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Malformed range arguments produce an error marker instead of 0.
    pub strict_ranges: bool,
    /// Reading a cell that shows an error marker makes the formula an error.
    pub propagate_errors: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            strict_ranges: false,
            propagate_errors: true,
        }
    }
}

/// Outcome of resolving one formula.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    /// A number, or the error marker to display.
    pub value: CellValue,
    /// Cells read by the formula; each is the source of a dependency edge.
    pub references: BTreeSet<CellRef>,
    /// The numeric expression handed to the evaluator, if it got that far.
    pub expression: Option<String>,
}

/// Parse, substitute and evaluate a formula body against the grid.
pub fn resolve(
    body: &str,
    grid: &Grid,
    evaluator: &dyn Evaluator,
    options: &ResolveOptions,
) -> Resolution {
    resolve_parsed(&parse_formula(body), grid, evaluator, options)
}

/// Substitute and evaluate an already scanned formula.
pub fn resolve_parsed(
    parsed: &ParsedFormula,
    grid: &Grid,
    evaluator: &dyn Evaluator,
    options: &ResolveOptions,
) -> Resolution {
    let references = parsed.references(grid);
    let fail = |error: CellError, references: BTreeSet<CellRef>| Resolution {
        value: CellValue::Error(error),
        references,
        expression: None,
    };

    let tokens = match substitute_ranges(parsed.tokens(), grid, options) {
        Ok(tokens) => tokens,
        Err(error) => return fail(error, references),
    };
    let tokens = match substitute_cells(&tokens, grid, options) {
        Ok(tokens) => tokens,
        Err(error) => return fail(error, references),
    };
    let expression = render(&tokens);
    tracing::trace!(expression = %expression, "substituted formula");

    let value = match evaluator.evaluate(&expression) {
        Ok(n) => CellValue::Number(n),
        Err(err) => {
            tracing::debug!(expression = %expression, error = %err, "evaluation failed");
            CellValue::Error(CellError::Eval)
        }
    };

    Resolution {
        value,
        references,
        expression: Some(expression),
    }
}

/// Numeric value of a cell as seen by formulas.
fn read_number(grid: &Grid, cell_ref: &CellRef, options: &ResolveOptions) -> Result<f64, CellError> {
    let Some(value) = grid.get(cell_ref).map(|cell| &cell.value) else {
        return Ok(0.0);
    };
    if value.is_error() && options.propagate_errors {
        return Err(CellError::Eval);
    }
    Ok(value.as_number().unwrap_or(0.0))
}

/// First pass: replace each range-function call with its aggregate.
fn substitute_ranges(
    tokens: &[Token],
    grid: &Grid,
    options: &ResolveOptions,
) -> Result<Vec<Token>, CellError> {
    tokens
        .iter()
        .map(|token| match token {
            Token::Range { function, arg } => match arg {
                RangeArg::Cells { start, end } => {
                    Ok(Token::Number(aggregate_range(*function, start, end, grid, options)?))
                }
                RangeArg::Malformed(_) if options.strict_ranges => Err(CellError::Range),
                RangeArg::Malformed(_) => Ok(Token::Number(0.0)),
            },
            other => Ok(other.clone()),
        })
        .collect()
}

fn aggregate_range(
    function: RangeFunction,
    start: &CellRef,
    end: &CellRef,
    grid: &Grid,
    options: &ResolveOptions,
) -> Result<f64, CellError> {
    let (rows, cols) = clipped_bounds(start, end, grid);
    let mut values = Vec::with_capacity(rows.len() * cols.len());
    for row in rows {
        for col in cols.clone() {
            values.push(read_number(grid, &CellRef::new(row, col), options)?);
        }
    }

    let addressed = (start.row.abs_diff(end.row) as u128 + 1) * (start.col.abs_diff(end.col) as u128 + 1);
    let missing = addressed - values.len() as u128;
    Ok(function.aggregate(&values, missing))
}

/// Second pass: replace each bare address with the referenced cell's number.
fn substitute_cells(
    tokens: &[Token],
    grid: &Grid,
    options: &ResolveOptions,
) -> Result<Vec<Token>, CellError> {
    tokens
        .iter()
        .map(|token| match token {
            Token::Ref(cell_ref) => Ok(Token::Number(read_number(grid, cell_ref, options)?)),
            other => Ok(other.clone()),
        })
        .collect()
}

fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Text(s) => out.push_str(s),
            Token::Number(n) => out.push_str(&format_operand(*n)),
            // Unreachable after both passes; keep the source text visible.
            Token::Ref(cell_ref) => out.push_str(&cell_ref.to_string()),
            Token::Range { function, .. } => out.push_str(function.sheet_name()),
        }
    }
    out
}
