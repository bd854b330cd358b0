//! Cell data structures for the spreadsheet grid.
//!
//! This module provides the core data types for representing cells:
//! - [`CellValue`] - An evaluated value (number or text)
//! - [`CellState`] - Evaluation outcome of a cell (pending, value, or error)
//! - [`Cell`] - A cell with raw input, evaluation state and dependency edges
//! - [`Grid`] - Row-major ordered storage for cells, keyed by coordinate

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::cell_ref::CellRef;

/// An evaluated cell value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }
}

/// Outcome of the last evaluation attempt.
///
/// A cell can never carry a value and an error at the same time.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellState {
    /// Not evaluated yet in the current pass.
    #[default]
    Pending,
    Value(CellValue),
    Error(String),
}

/// A cell in the spreadsheet grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub coord: CellRef,
    pub input: String,
    pub state: CellState,
    /// Cells this cell's formula reads (outgoing edges).
    pub dependencies: BTreeSet<CellRef>,
    /// Cells whose formulas read this cell (reverse index).
    pub dependents: BTreeSet<CellRef>,
    /// Id of a reference that pointed at a deleted row/column.
    /// Survives evaluation passes until the input is edited.
    pub deleted_ref: Option<String>,
}

impl Cell {
    pub fn new_empty(coord: CellRef) -> Cell {
        Cell::with_input(coord, "")
    }

    pub fn with_input(coord: CellRef, input: &str) -> Cell {
        Cell {
            coord,
            input: input.to_string(),
            state: CellState::Pending,
            dependencies: BTreeSet::new(),
            dependents: BTreeSet::new(),
            deleted_ref: None,
        }
    }

    /// The cell's textual id, derived from its coordinate.
    pub fn id(&self) -> String {
        self.coord.to_string()
    }

    pub fn is_formula(&self) -> bool {
        self.input.starts_with('=')
    }

    pub fn value(&self) -> Option<&CellValue> {
        match &self.state {
            CellState::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            CellState::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, CellState::Pending)
    }

    pub fn set_value(&mut self, value: CellValue) {
        self.state = CellState::Value(value);
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.state = CellState::Error(error.into());
    }

    /// Replace the raw input and forget any evaluation result.
    /// Dependency edges are owned by the grid and are not touched here.
    pub fn update_input(&mut self, input: &str) {
        self.input = input.to_string();
        self.state = CellState::Pending;
        self.deleted_ref = None;
    }
}

/// Cell storage, keyed by coordinate and iterated in row-major order.
pub type Grid = BTreeMap<CellRef, Cell>;
