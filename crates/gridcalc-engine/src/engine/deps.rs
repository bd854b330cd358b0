//! Dependency extraction and surface validation of formula strings.
//!
//! Parses formula text to find all cell references (e.g., `A1`, `B12`)
//! that the formula depends on. This is used to build the dependency graph
//! for evaluation ordering and cycle detection.
//!
//! References are found by a single scanner ([`scan_segments`]) instead of a
//! pattern engine: the formula is split into maximal ASCII word runs, and a
//! run is a reference iff it is one uppercase letter followed by a row
//! number without a leading zero. `AB12`, `A01` and `2A1` are never
//! references. Substitution and reference shifting reuse the same scanner.

use thiserror::Error;

use super::cell_ref::CellRef;

/// Surface syntax errors for a formula.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error("Formula must start with =")]
    MissingPrefix,

    #[error("Formula cannot be empty")]
    Empty,

    #[error("Formula contains invalid characters")]
    InvalidCharacters,

    #[error("Mismatched parentheses")]
    MismatchedParentheses,

    #[error("Unbalanced parentheses")]
    UnbalancedParentheses,
}

/// A slice of formula text as classified by the reference scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Text(&'a str),
    Reference(&'a str),
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_reference_token(run: &str) -> bool {
    let bytes = run.as_bytes();
    bytes.len() >= 2
        && bytes[0].is_ascii_uppercase()
        && matches!(bytes[1], b'1'..=b'9')
        && bytes[2..].iter().all(u8::is_ascii_digit)
}

/// Split an expression into text and reference segments.
///
/// Concatenating every segment reproduces the input exactly.
pub(crate) fn scan_segments(expr: &str) -> Vec<Segment<'_>> {
    let bytes = expr.as_bytes();
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if !is_word_byte(bytes[i]) {
            i += 1;
            continue;
        }

        let run_start = i;
        while i < bytes.len() && is_word_byte(bytes[i]) {
            i += 1;
        }

        let run = &expr[run_start..i];
        if is_reference_token(run) {
            if text_start < run_start {
                segments.push(Segment::Text(&expr[text_start..run_start]));
            }
            segments.push(Segment::Reference(run));
            text_start = i;
        }
    }

    if text_start < expr.len() {
        segments.push(Segment::Text(&expr[text_start..]));
    }

    segments
}

/// Extract all cell references from a formula as ids.
///
/// Returns an empty list for non-formulas (input not starting with `=`).
/// Duplicates are removed; the first occurrence order is kept.
pub fn extract_references(formula: &str) -> Vec<String> {
    let Some(expr) = formula.strip_prefix('=') else {
        return Vec::new();
    };

    let mut refs: Vec<String> = Vec::new();
    for segment in scan_segments(expr) {
        if let Segment::Reference(id) = segment
            && !refs.iter().any(|r| r == id)
        {
            refs.push(id.to_string());
        }
    }
    refs
}

/// Validate formula surface syntax without evaluating it.
pub fn validate_syntax(formula: &str) -> Result<(), FormulaError> {
    let expr = formula
        .strip_prefix('=')
        .ok_or(FormulaError::MissingPrefix)?;

    if expr.trim().is_empty() {
        return Err(FormulaError::Empty);
    }

    let allowed = |c: char| {
        c.is_ascii_uppercase()
            || c.is_ascii_digit()
            || c.is_whitespace()
            || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.')
    };
    if !expr.chars().all(allowed) {
        return Err(FormulaError::InvalidCharacters);
    }

    let mut depth: usize = 0;
    for c in expr.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(FormulaError::MismatchedParentheses)?;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(FormulaError::UnbalancedParentheses);
    }

    Ok(())
}

/// True iff `id` decodes to a cell inside a `rows` x `cols` grid.
/// Undecodable ids are simply out of bounds.
pub fn is_reference_in_bounds(id: &str, rows: usize, cols: usize) -> bool {
    CellRef::from_id(id).is_some_and(|cr| cr.in_bounds(rows, cols))
}
