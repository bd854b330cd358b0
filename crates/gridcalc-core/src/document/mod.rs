//! Document state and logic (UI-agnostic).

mod eval;
mod io;
mod ops;
mod snapshot;
mod state;

pub use snapshot::{CellErrorReport, CellSnapshot, EvaluationResult, GridSnapshot};
pub use state::{DEFAULT_COLS, DEFAULT_ROWS, Document};
