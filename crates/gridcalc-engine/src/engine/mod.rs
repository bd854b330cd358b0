//! Spreadsheet engine API.
//!
//! This module provides the computation primitives for the spreadsheet:
//!
//! - [`Cell`], [`CellState`], [`CellValue`], [`Grid`] - Data structures for cell storage
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`extract_references`], [`validate_syntax`], [`is_reference_in_bounds`] - Formula analysis
//! - [`evaluate_expression`], [`evaluate_literal`] - Arithmetic and literal evaluation
//! - [`substitute_references`], [`shift_formula_references`] - Formula rewriting
//! - [`find_cycle_members`] - Circular dependency detection
//! - [`format_value`] - Format values for display

mod cell;
mod cell_ref;
mod cycle;
mod deps;
mod expr;
mod format;
mod preprocess;

pub use cell::{Cell, CellState, CellValue, Grid};
pub use cell_ref::{CellRef, MAX_COLS, MAX_ROWS};
pub use cycle::find_cycle_members;
pub use deps::{FormulaError, extract_references, is_reference_in_bounds, validate_syntax};
pub use expr::{EvalError, MAX_NESTING_DEPTH, evaluate_expression, evaluate_literal};
pub use format::{format_number, format_value, number_literal};
pub use preprocess::{
    ShiftOperation, ShiftOutcome, shift_formula_references, shift_single_ref,
    substitute_references,
};
