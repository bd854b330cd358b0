//! Formula preprocessing and reference transformation.
//!
//! Before a formula can be handed to the arithmetic evaluator, its cell
//! references must be replaced with literal numbers. This module handles:
//!
//! - **Substitution**: `=A1*3` with `A1 = 2` becomes `2*3`
//! - **Reference shifting**: adjusting references when a row or column is deleted
//!
//! Both walk the formula once with the same reference scanner used for
//! dependency extraction, so a token is rewritten at most once and
//! rewrites never cascade (`A3 -> A2` is not followed by `A2 -> A1`).

use super::cell_ref::CellRef;
use super::deps::{Segment, scan_segments};
use super::format::number_literal;

/// Structural edit that moves cells toward a removed row or column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftOperation {
    DeleteRow(usize),
    DeleteColumn(usize),
}

/// Result of rewriting a formula for a [`ShiftOperation`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShiftOutcome {
    /// The formula with every reference past the removed index shifted.
    /// Equal to the input when nothing needed to move.
    Rewritten(String),
    /// The formula referenced a cell in the removed row/column; the
    /// payload is that reference's id and the formula is left as is.
    DeletedReference(String),
}

/// Shift cell references in a formula for a row/column deletion.
///
/// Rules:
/// - Delete row at R: refs to row > R become row - 1; a ref to row R is a deleted reference
/// - Same logic for columns
/// - Non-formula input is returned unchanged
pub fn shift_formula_references(formula: &str, op: ShiftOperation) -> ShiftOutcome {
    let Some(expr) = formula.strip_prefix('=') else {
        return ShiftOutcome::Rewritten(formula.to_string());
    };

    let mut out = String::with_capacity(formula.len());
    out.push('=');

    for segment in scan_segments(expr) {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Reference(id) => {
                let Some(cr) = CellRef::from_id(id) else {
                    out.push_str(id);
                    continue;
                };
                match shift_single_ref(cr, op) {
                    Some(shifted) => out.push_str(&shifted.to_string()),
                    None => return ShiftOutcome::DeletedReference(id.to_string()),
                }
            }
        }
    }

    ShiftOutcome::Rewritten(out)
}

/// New position of `cr` after `op`, or None if `cr` itself was removed.
pub fn shift_single_ref(cr: CellRef, op: ShiftOperation) -> Option<CellRef> {
    match op {
        ShiftOperation::DeleteRow(at_row) => {
            if cr.row == at_row {
                None
            } else if cr.row > at_row {
                Some(CellRef::new(cr.row - 1, cr.col))
            } else {
                Some(cr)
            }
        }
        ShiftOperation::DeleteColumn(at_col) => {
            if cr.col == at_col {
                None
            } else if cr.col > at_col {
                Some(CellRef::new(cr.row, cr.col - 1))
            } else {
                Some(cr)
            }
        }
    }
}

/// Replace every reference in a formula with its numeric value.
///
/// Returns the bare arithmetic expression (without the leading `=`), or
/// the id of the first reference `lookup` could not resolve.
pub fn substitute_references<F>(formula: &str, lookup: F) -> Result<String, String>
where
    F: Fn(&str) -> Option<f64>,
{
    let expr = formula.strip_prefix('=').unwrap_or(formula);
    let mut out = String::with_capacity(expr.len());

    for segment in scan_segments(expr) {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Reference(id) => {
                let value = lookup(id).ok_or_else(|| id.to_string())?;
                out.push_str(&number_literal(value));
            }
        }
    }

    Ok(out)
}
