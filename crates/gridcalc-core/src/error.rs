//! Error types for Gridcalc core.
//!
//! These are operation failures (bad index, unknown cell, unreadable file).
//! Per-cell formula failures are not errors here: they are recorded on the
//! cell and reported by the evaluation pass.

use thiserror::Error;

/// Errors that can occur when operating on a document
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Row index out of bounds")]
    RowOutOfBounds,

    #[error("Column index out of bounds")]
    ColumnOutOfBounds,

    #[error("Cannot delete the last row")]
    LastRow,

    #[error("Cannot delete the last column")]
    LastColumn,

    #[error("Maximum 26 columns supported (A-Z)")]
    TooManyColumns,

    #[error("Maximum 65536 rows supported")]
    TooManyRows,

    #[error("Invalid grid dimensions {rows}x{cols}: need 1-65536 rows and 1-26 columns")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Cell {0} not found")]
    CellNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GridError>;
